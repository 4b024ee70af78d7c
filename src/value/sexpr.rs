//! Reading values from S-expression text.

use num_bigint::BigInt;

use crate::error::{Error, Result};

use super::{Integer, Value};

impl Value {
    pub fn parse(text: &str) -> Result<Value> {
        let expr = lexpr::from_str(text)?;
        Value::from_sexpr(&expr)
    }

    pub fn from_sexpr(expr: &lexpr::Value) -> Result<Value> {
        Ok(match expr {
            lexpr::Value::Nil => Value::nil(),
            lexpr::Value::Null => Value::new_list([]),
            lexpr::Value::Bool(b) => Value::new_bool(*b),
            lexpr::Value::Number(n) => parse_number(n)?,
            lexpr::Value::Char(c) => Value::new_string(c.to_string()),
            lexpr::Value::String(s) | lexpr::Value::Symbol(s) => Value::new_string(&**s),
            lexpr::Value::Cons(_) => {
                if !expr.is_list() {
                    return Err(Error::UnsupportedExpr {
                        kind: "improper list",
                    });
                }
                let items = expr.list_iter().ok_or(Error::UnsupportedExpr {
                    kind: "improper list",
                })?;
                let items: Vec<_> = items.map(Value::from_sexpr).collect::<Result<_>>()?;
                Value::from(items)
            }
            lexpr::Value::Vector(items) => {
                let items: Vec<_> = items.iter().map(Value::from_sexpr).collect::<Result<_>>()?;
                Value::from(items)
            }
            lexpr::Value::Keyword(_) => return Err(Error::UnsupportedExpr { kind: "keyword" }),
            _ => return Err(Error::UnsupportedExpr { kind: "byte vector" }),
        })
    }
}

fn parse_number(n: &lexpr::Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::new_integer(Integer::from(BigInt::from(u))))
    } else if let Some(f) = n.as_f64() {
        Ok(Value::new_float(f))
    } else {
        Err(Error::UnsupportedExpr { kind: "number" })
    }
}

#[cfg(test)]
mod tests {
    use num_traits::ToPrimitive;

    use super::*;

    #[test]
    fn test_parse_nested_list() -> anyhow::Result<()> {
        let value = Value::parse(r#"(1 (2 x) "s")"#)?;
        assert_eq!(
            value,
            Value::new_list([
                Value::from(1),
                Value::new_list([Value::from(2), Value::from("x")]),
                Value::from("s"),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_parse_scalars() -> anyhow::Result<()> {
        assert_eq!(Value::parse("()")?, Value::new_list([]));
        assert_eq!(Value::parse("#f")?, Value::from(false));
        assert_eq!(Value::parse("1.5")?, Value::from(1.5));
        assert_eq!(Value::parse("#(1 2)")?, Value::parse("(1 2)")?);
        assert!(Value::from_sexpr(&lexpr::Value::Nil)?.is_nil());
        Ok(())
    }

    #[test]
    fn test_parse_large_unsigned() -> anyhow::Result<()> {
        let value = Value::parse("18446744073709551615")?;
        assert_eq!(value.as_int()?.to_u64(), Some(u64::MAX));
        Ok(())
    }

    #[test]
    fn test_rejects_improper_list() {
        assert!(matches!(
            Value::parse("(1 . 2)"),
            Err(Error::UnsupportedExpr {
                kind: "improper list"
            })
        ));
    }

    #[test]
    fn test_reports_syntax_errors() {
        assert!(matches!(Value::parse("(1 2"), Err(Error::Parse(_))));
    }
}
