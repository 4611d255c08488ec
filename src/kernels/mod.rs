//! Kernel building blocks: closed-form butterflies, the shared stage loop, the unrolled small
//! codelets and the instruction-set-specialized core codelets.
pub mod common;
pub(crate) mod simd;
pub(crate) mod stages;
pub mod unrolled;

pub use common::{butterfly2, butterfly3, butterfly4, butterfly5, butterfly8};
