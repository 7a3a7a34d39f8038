pub mod dual_font;
pub mod markup;
pub mod policy;
pub mod segment;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testing;

pub use dual_font::{DualFont, DualFontBuilder, FormatError, Formatted, apply};
pub use markup::{MarkupTree, ParseError};
pub use policy::{ConfigError, FontPolicy, FormatterConfig, UnitSyntax};
pub use segment::{Run, segment};
pub use unicode::{ScriptClass, classify};
