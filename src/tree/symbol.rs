use std::collections::HashMap;
use std::{error, fmt};

/// Maps the names visible inside one function to their stack slots.
///
/// Parameters come first, locals after them, each in declaration order,
/// so the slot of a name is also its position in the activation record.
#[derive(Debug, Eq, PartialEq)]
pub struct SymbolTable<'src> {
    symbols: HashMap<&'src str, usize>,
}

impl<'src> SymbolTable<'src> {
    pub fn new() -> Self {
        SymbolTable {
            symbols: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'src str) -> Result<usize, SymbolError<'src>> {
        if self.exists(name) {
            return Err(SymbolError::Collision { name });
        }

        let pos = self.symbols.len();
        self.symbols.insert(name, pos);

        Ok(pos)
    }

    pub fn resolve(&self, name: &'src str) -> Result<usize, SymbolError<'src>> {
        self.symbols
            .get(name)
            .cloned()
            .ok_or(SymbolError::Undefined { name })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum SymbolError<'src> {
    Collision { name: &'src str },
    Undefined { name: &'src str },
}

impl<'src> fmt::Display for SymbolError<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolError::Collision { name } => {
                format!("symbol collision: '{}' already defined", name)
            }
            SymbolError::Undefined { name } => {
                format!("invalid symbol: '{}' is not defined", name)
            }
        };

        write!(f, "{}", s)
    }
}

impl<'src> error::Error for SymbolError<'src> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_hands_out_ascending_slots() {
        let mut table = SymbolTable::new();

        assert_eq!(Ok(0), table.register("x"));
        assert_eq!(Ok(1), table.register("y"));
    }

    #[test]
    fn test_register_twice_is_a_collision() {
        let mut table = SymbolTable::new();

        table.register("x").unwrap();
        assert_eq!(Err(SymbolError::Collision { name: "x" }), table.register("x"));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let table = SymbolTable::new();

        assert_eq!(Err(SymbolError::Undefined { name: "x" }), table.resolve("x"));
    }

    #[test]
    fn test_exists_does_not_fail() {
        let mut table = SymbolTable::new();

        assert!(!table.exists("x"));
        table.register("x").unwrap();
        assert!(table.exists("x"));
    }

    #[test]
    fn test_resolve_returns_the_registered_slot() {
        let mut table = SymbolTable::new();

        table.register("x").unwrap();
        table.register("y").unwrap();

        assert_eq!(Ok(1), table.resolve("y"));
        assert_eq!(Ok(0), table.resolve("x"));
    }

    #[test]
    fn test_error_messages() {
        let collision = SymbolError::Collision { name: "x" };
        let undefined = SymbolError::Undefined { name: "y" };

        assert_eq!("symbol collision: 'x' already defined", collision.to_string());
        assert_eq!("invalid symbol: 'y' is not defined", undefined.to_string());
    }
}
