// Text module - tag tree model and line segmentation
//
// The session layer hands us chunks of styled text as tag trees; everything
// the client displays goes through `split_into_lines` exactly once per
// chunk, then lives in scrollback as immutable `Line`s.

pub mod flatten;
pub mod split;
pub mod tag;

pub use flatten::{walk, walk_all, TagVisitor};
pub use split::{split_into_lines, Line, LineId};
pub use tag::TagNode;
