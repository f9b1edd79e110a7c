mod conj;

mod prep;

mod referent;

mod pipeline;
pub use crate::pipeline::{
    cc_processed_dependencies, collapsed_dependencies, CollapseOptions, Collapser,
};
