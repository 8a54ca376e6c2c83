// lints
#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::manual_range_contains,
    clippy::bool_to_int_with_if,
    clippy::collapsible_else_if,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod cell;
mod pos;
mod rule;
mod torus;
mod triplet;
mod ops {
    mod bitwise;
    mod change_list;
    pub(crate) mod counts;
    mod engine;
    mod naive;
    mod population;
    mod rle_format;
    mod test_format;
    mod triplets;

    pub use bitwise::*;
    pub use change_list::*;
    pub use engine::*;
    pub use naive::*;
    pub use population::*;
    pub use rle_format::*;
    pub use test_format::*;
    pub use triplets::*;
}

pub use cell::*;
pub use ops::*;
pub use pos::*;
pub use rule::*;
pub use torus::*;
pub use triplet::*;
