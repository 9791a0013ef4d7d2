//! Decoded rows.

use std::fmt;

use super::Value;

/// One row as decoded from a tuple or produced by a projection, in column
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Wraps `values`.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value of column `index`, if the row has one.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Every value, in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Picks `columns` in the given order. An index past the end yields
    /// NULL.
    pub fn project(&self, columns: &[usize]) -> Row {
        Row::new(
            columns
                .iter()
                .map(|&column| self.get(column).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.values.iter().map(Value::to_string).collect();
        write!(f, "({})", cells.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_display() {
        let row = Row::new(vec![Value::Int(1), Value::from("hello"), Value::Null]);
        assert_eq!(row.to_string(), "(1, hello, NULL)");
        assert_eq!(Row::default().to_string(), "()");
    }

    #[test]
    fn test_row_project() {
        let row = Row::new(vec![Value::Int(1), Value::from("x"), Value::Long(9)]);
        let projected = row.project(&[2, 0, 7]);
        assert_eq!(projected.values(), &[Value::Long(9), Value::Int(1), Value::Null]);
        assert!(row.project(&[]).values().is_empty());
    }
}
