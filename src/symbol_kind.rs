use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
/// Category of a declared symbol, shared by every supported dialect.
pub enum SymbolKind {
    Class,
    Interface,
    Struct,
    Enum,
    Record,
    Delegate,
    Namespace,
    Module,
    Method,
    Constructor,
    Function,
    Property,
    Field,
    Event,
    Const,
    Static,
    Trait,
    TypeAlias,
    Variant,
}

impl SymbolKind {
    /// Lower-cased canonical name of the kind, as emitted in records.
    ///
    /// ## Returns:
    /// * (`&'static str`): Canonical name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Record => "record",
            SymbolKind::Delegate => "delegate",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Module => "module",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Function => "function",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
            SymbolKind::Event => "event",
            SymbolKind::Const => "const",
            SymbolKind::Static => "static",
            SymbolKind::Trait => "trait",
            SymbolKind::TypeAlias => "typealias",
            SymbolKind::Variant => "variant",
        }
    }
}

impl Display for SymbolKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}
