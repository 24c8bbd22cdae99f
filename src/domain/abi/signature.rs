//! Human-readable function signature parsing

use std::fmt;

/// A function signature split into its name and top-level parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function name (text before the first `(`)
    pub name: String,
    /// Parameter type tokens in declaration order
    pub params: Vec<String>,
}

impl FunctionSignature {
    pub fn parse(signature: &str) -> Self {
        let name = signature
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        Self {
            name,
            params: parse_signature_types(signature),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// Extract the parameter type tokens of `name(type1,type2,...)`.
///
/// The list runs from the first `(` to the last `)`. Commas nested inside
/// parentheses or brackets belong to the enclosing token, so tuple and array
/// types stay intact.
pub fn parse_signature_types(signature: &str) -> Vec<String> {
    let (Some(open), Some(close)) = (signature.find('('), signature.rfind(')')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }

    let params = &signature[open + 1..close];
    if params.trim().is_empty() {
        return Vec::new();
    }

    let mut types = Vec::new();
    let mut current = String::new();
    let mut depth: isize = 0;

    for ch in params.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                types.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        types.push(last.to_string());
    }

    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_signature() {
        assert_eq!(
            parse_signature_types("transfer(address,uint256)"),
            vec!["address", "uint256"]
        );
    }

    #[test]
    fn test_nested_tuple_array() {
        assert_eq!(
            parse_signature_types("f((uint256,address)[],bool)"),
            vec!["(uint256,address)[]", "bool"]
        );
        assert_eq!(
            parse_signature_types("g(uint256[2][],(bytes,(address,uint8)),string)"),
            vec!["uint256[2][]", "(bytes,(address,uint8))", "string"]
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            parse_signature_types("approve( address spender , uint256 )"),
            vec!["address spender", "uint256"]
        );
    }

    #[test]
    fn test_no_params() {
        assert!(parse_signature_types("totalSupply()").is_empty());
        assert!(parse_signature_types("totalSupply(   )").is_empty());
        assert!(parse_signature_types("invalid").is_empty());
        assert!(parse_signature_types(")oops(").is_empty());
    }

    #[test]
    fn test_function_signature_display() {
        let sig = FunctionSignature::parse("swap((address,uint24),uint256,bytes)");
        assert_eq!(sig.name, "swap");
        assert_eq!(sig.params.len(), 3);
        assert_eq!(sig.to_string(), "swap((address,uint24), uint256, bytes)");
    }
}
