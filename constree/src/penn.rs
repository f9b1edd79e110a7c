//! Penn-bracket tree reading and rendering.

use std::fmt::{self, Display, Formatter};
use std::io;

use crate::error::{IOError, ParseError};
use crate::label::Label;
use crate::tree::Tree;

/// Parse a single bracketed tree.
///
/// Accepts the usual treebank conventions: arbitrary whitespace between
/// tokens, and an unlabeled wrapper around the top constituent
/// (`( (S ...) )`), which is unwrapped. Anything but whitespace after
/// the closing bracket is an error.
pub fn parse_tree(input: &str) -> Result<Tree, ParseError> {
    let mut scanner = Scanner::new(input);
    scanner.skip_whitespace();

    if scanner.peek().is_none() {
        return Err(ParseError::Empty);
    }

    let expr = parse_expr(&mut scanner, input)?;
    scanner.skip_whitespace();
    if scanner.peek().is_some() {
        return Err(ParseError::TrailingMaterial {
            value: scanner.rest().to_owned(),
        });
    }

    Ok(flatten(unwrap_top(expr)))
}

#[derive(Debug)]
enum SExpr {
    Leaf(String),
    Node(String, Vec<SExpr>),
}

/// Remove an unlabeled single-child wrapper; relabel a bare one `ROOT`.
fn unwrap_top(expr: SExpr) -> SExpr {
    match expr {
        SExpr::Node(label, mut children) if label.is_empty() => {
            if children.len() == 1 {
                children.pop().unwrap()
            } else {
                SExpr::Node("ROOT".to_owned(), children)
            }
        }
        expr => expr,
    }
}

fn flatten(expr: SExpr) -> Tree {
    match expr {
        SExpr::Leaf(word) => Tree::new(Label::new(word)),
        SExpr::Node(label, children) => {
            let mut tree = Tree::new(Label::new(label));
            let root = tree.root();
            for child in children {
                flatten_into(&mut tree, root, child);
            }
            tree
        }
    }
}

fn flatten_into(tree: &mut Tree, parent: usize, expr: SExpr) {
    match expr {
        SExpr::Leaf(word) => {
            tree.add_child(parent, Label::new(word));
        }
        SExpr::Node(label, children) => {
            let node = tree.add_child(parent, Label::new(label));
            for child in children {
                flatten_into(tree, node, child);
            }
        }
    }
}

fn parse_expr(scanner: &mut Scanner, input: &str) -> Result<SExpr, ParseError> {
    if scanner.peek() != Some('(') {
        return Err(ParseError::UnbalancedBrackets {
            value: input.trim().to_owned(),
        });
    }
    scanner.bump();
    scanner.skip_whitespace();

    let label = scanner.atom().to_owned();
    let mut children = Vec::new();

    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => {
                return Err(ParseError::UnbalancedBrackets {
                    value: input.trim().to_owned(),
                })
            }
            Some(')') => {
                scanner.bump();
                break;
            }
            Some('(') => children.push(parse_expr(scanner, input)?),
            Some(_) => children.push(SExpr::Leaf(scanner.atom().to_owned())),
        }
    }

    if children.is_empty() {
        return Err(ParseError::EmptyConstituent { value: label });
    }

    Ok(SExpr::Node(label, children))
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Consume a run of characters up to whitespace or a bracket.
    fn atom(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }
}

/// A trait for objects that can read bracketed `Tree`s.
pub trait ReadTree {
    /// Read a `Tree` from this object.
    ///
    /// # Errors
    ///
    /// A call to `read_tree` may generate an error to indicate that the
    /// operation could not be completed.
    fn read_tree(&mut self) -> Result<Option<Tree>, IOError>;

    /// Get an iterator over the trees in this reader.
    fn trees(self) -> Trees<Self>
    where
        Self: Sized,
    {
        Trees { reader: self }
    }
}

/// A reader for bracketed trees.
///
/// Trees may span multiple lines and several trees may share a line;
/// the reader consumes one balanced bracketing at a time.
pub struct Reader<R> {
    read: R,
    pending: String,
}

impl<R: io::BufRead> Reader<R> {
    /// Construct a new reader from an object that implements the
    /// `io::BufRead` trait.
    pub fn new(read: R) -> Reader<R> {
        Reader {
            read,
            pending: String::new(),
        }
    }
}

impl<R: io::BufRead> IntoIterator for Reader<R> {
    type Item = Result<Tree, IOError>;
    type IntoIter = Trees<Reader<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees()
    }
}

impl<R: io::BufRead> ReadTree for Reader<R> {
    fn read_tree(&mut self) -> Result<Option<Tree>, IOError> {
        loop {
            match balanced_span(&self.pending) {
                Span::Complete(end) => {
                    let tree = parse_tree(&self.pending[..end])?;
                    self.pending.drain(..end);
                    return Ok(Some(tree));
                }
                Span::Blank => self.pending.clear(),
                Span::Incomplete => {}
            }

            let mut line = String::new();
            if self.read.read_line(&mut line)? == 0 {
                if self.pending.trim().is_empty() {
                    return Ok(None);
                }

                return Err(ParseError::UnbalancedBrackets {
                    value: self.pending.trim().to_owned(),
                }
                .into());
            }
            self.pending.push_str(&line);
        }
    }
}

enum Span {
    /// A balanced bracketing ends at this byte offset.
    Complete(usize),
    /// Only whitespace so far.
    Blank,
    /// An opened bracketing that has not closed yet.
    Incomplete,
}

fn balanced_span(pending: &str) -> Span {
    let mut depth = 0usize;
    let mut seen_bracket = false;

    for (pos, c) in pending.char_indices() {
        match c {
            '(' => {
                depth += 1;
                seen_bracket = true;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Span::Complete(pos + 1);
                }
            }
            _ => {}
        }
    }

    if seen_bracket {
        Span::Incomplete
    } else {
        Span::Blank
    }
}

/// An iterator over the trees in a `Reader`.
pub struct Trees<R>
where
    R: ReadTree,
{
    reader: R,
}

impl<R> Iterator for Trees<R>
where
    R: ReadTree,
{
    type Item = Result<Tree, IOError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_tree() {
            Ok(None) => None,
            Ok(Some(tree)) => Some(Ok(tree)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Bracketed rendering of a tree or subtree.
///
/// Rendering a parsed tree reproduces the bracketing up to whitespace:
/// `(S (NP (PRP She)) ...)`.
pub struct PennTree<'a> {
    tree: &'a Tree,
    node: usize,
}

impl<'a> PennTree<'a> {
    /// Render a whole tree.
    pub fn borrowed(tree: &'a Tree) -> Self {
        PennTree {
            tree,
            node: tree.root(),
        }
    }

    /// Render the subtree rooted at `node`.
    pub fn subtree(tree: &'a Tree, node: usize) -> Self {
        PennTree { tree, node }
    }
}

impl<'a> Display for PennTree<'a> {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt_node(fmt, self.tree, self.node)
    }
}

fn fmt_node(fmt: &mut Formatter, tree: &Tree, node: usize) -> Result<(), fmt::Error> {
    if tree.is_leaf(node) {
        return write!(fmt, "{}", tree[node].label().value());
    }

    write!(fmt, "({}", tree[node].label().value())?;
    for &child in tree.children(node) {
        write!(fmt, " ")?;
        fmt_node(fmt, tree, child)?;
    }
    write!(fmt, ")")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::error::ParseError;

    use super::{parse_tree, ReadTree, Reader};

    #[test]
    fn round_trip() {
        let bracketing = "(S (NP (PRP She)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise))))";
        let tree = parse_tree(bracketing).unwrap();
        assert_eq!(tree.to_string(), bracketing);
    }

    #[test]
    fn sloppy_whitespace() {
        let tree = parse_tree("  (S\n  (NP (PRP She))\n  (VP (VBD slept)))\n").unwrap();
        assert_eq!(tree.to_string(), "(S (NP (PRP She)) (VP (VBD slept)))");
    }

    #[test]
    fn unlabeled_wrapper_is_unwrapped() {
        let tree = parse_tree("( (S (NP (PRP She)) (VP (VBD slept))) )").unwrap();
        assert_eq!(tree[tree.root()].label().value(), "S");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_tree("  \n "), Err(ParseError::Empty));
    }

    #[test]
    fn unbalanced_brackets_are_rejected() {
        assert_eq!(
            parse_tree("(S (NP (PRP She))"),
            Err(ParseError::UnbalancedBrackets {
                value: "(S (NP (PRP She))".to_owned()
            })
        );
    }

    #[test]
    fn empty_constituent_is_rejected() {
        assert_eq!(
            parse_tree("(S (NP ) (VP (VBD slept)))"),
            Err(ParseError::EmptyConstituent {
                value: "NP".to_owned()
            })
        );
    }

    #[test]
    fn trailing_material_is_rejected() {
        assert!(matches!(
            parse_tree("(NP (NN dog)) junk"),
            Err(ParseError::TrailingMaterial { .. })
        ));
    }

    #[test]
    fn reader_reads_multiple_trees() {
        let data = "(NP (NN dog))\n\n(NP (NN cat))\n(NP\n  (NN fish))\n";
        let trees: Vec<_> = Reader::new(Cursor::new(data))
            .trees()
            .map(|tree| tree.unwrap().to_string())
            .collect();
        assert_eq!(
            trees,
            vec!["(NP (NN dog))", "(NP (NN cat))", "(NP (NN fish))"]
        );
    }

    #[test]
    fn reader_rejects_unbalanced_tail() {
        let data = "(NP (NN dog))\n(NP (NN cat)\n";
        let mut reader = Reader::new(Cursor::new(data));
        assert!(reader.read_tree().unwrap().is_some());
        assert!(reader.read_tree().is_err());
    }
}
