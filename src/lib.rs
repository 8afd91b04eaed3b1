// mudview - terminal client core for text-based multi-user games
//
// The core pipeline: a session feed delivers chunks of styled text as tag
// trees; the splitter turns each chunk into identified display lines; the
// renderer resolves styling against an injected theme; the scroll anchor
// keeps the view following new output unless the user has scrolled away;
// and the key-combo dispatcher maps held-key sequences to actions.
//
// Everything outside this pipeline (transport, protocol framing) is a
// collaborator: events in, rendered lines and callbacks out.

pub mod cli;
pub mod config;
pub mod demo;
pub mod events;
pub mod logging;
pub mod render;
pub mod text;
pub mod theme;
pub mod tui;
