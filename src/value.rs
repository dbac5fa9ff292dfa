use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    /// What a function call yields when it ends without `return <value>`.
    Nothing,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    List(Rc<Vec<Value>>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nothing, Value::Nothing) => true,
            (Value::Bool(left_bool), Value::Bool(right_bool)) => left_bool == right_bool,
            (Value::Number(left_num), Value::Number(right_num)) => left_num == right_num,
            (Value::String(left_str), Value::String(right_str)) => left_str == right_str,
            (Value::List(left_list), Value::List(right_list)) => left_list == right_list,
            _ => false,
        }
    }
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Rc::from(text.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nothing => "nothing",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "text",
            Value::List(_) => "list",
        }
    }

    /// Numeric view used by arithmetic and comparisons: booleans count as 1 and 0.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(flag) => *flag,
            Value::Number(number) => *number != 0.0,
            Value::String(text) => {
                let lowered = text.to_lowercase();
                !(lowered.is_empty() || lowered == "false" || lowered == "no")
            }
            Value::List(items) => !items.is_empty(),
            Value::Nothing => true,
        }
    }

    /// Equality as `equals` sees it: numbers and booleans compare numerically,
    /// lists element by element, any other mix of types is unequal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(left), Value::List(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right.iter()).all(|(a, b)| a.loosely_equals(b))
            }
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Nothing, Value::Nothing) => true,
            _ => match (self.as_numeric(), other.as_numeric()) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            },
        }
    }

    /// Ordering for `is greater than` / `is less than`; `None` when the types do not order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
            (Value::List(left), Value::List(right)) => {
                for (a, b) in left.iter().zip(right.iter()) {
                    match a.compare(b)? {
                        Ordering::Equal => continue,
                        decided => return Some(decided),
                    }
                }
                Some(left.len().cmp(&right.len()))
            }
            _ => {
                let left = self.as_numeric()?;
                let right = other.as_numeric()?;
                left.partial_cmp(&right)
            }
        }
    }
}

/// Integral numbers print without a decimal point; everything else uses the shortest
/// round-trip form.
pub fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nothing => f.write_str("nothing"),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Number(number) => f.write_str(&format_number(*number)),
            Value::String(text) => f.write_str(text),
            Value::List(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Value::List(_) => format!("[{}]", item),
                        _ => item.to_string(),
                    })
                    .collect();
                f.write_str(&rendered.join(", "))
            }
        }
    }
}
