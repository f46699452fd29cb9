use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use im::Vector;

use crate::env::EnvRef;
use crate::error::SorrelError;
use crate::value_format::{format_value, FormatMode};

/// Named character literals: `\space`, `\newline`, `\tab`.
pub const CHARACTER_NAMES: [(char, &str); 3] =
    [(' ', "space"), ('\n', "newline"), ('\t', "tab")];

/// The fifteen reader-visible discriminators, in their fixed order.
/// The derived `Ord` on this enum is the discriminator rank used by the
/// total order on `Value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Nil,
    Bool,
    Int,
    Float,
    Char,
    Str,
    Symbol,
    Keyword,
    Vector,
    List,
    Set,
    Map,
    Tagged,
    Quoted,
    Callable,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Nil => "nil",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Char => "char",
            ValueType::Str => "str",
            ValueType::Symbol => "symbol",
            ValueType::Keyword => "keyword",
            ValueType::Vector => "vector",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::Map => "map",
            ValueType::Tagged => "tagged",
            ValueType::Quoted => "quoted",
            ValueType::Callable => "function",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FnArity {
    min: usize,
    max: Option<usize>,
}

impl FnArity {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        if let Some(max_val) = max {
            assert!(min <= max_val, "min arity cannot exceed max arity");
        }
        Self { min, max }
    }

    pub fn exact(count: usize) -> Self {
        Self::new(count, Some(count))
    }

    pub fn at_least(min: usize) -> Self {
        Self::new(min, None)
    }

    pub fn range(min: usize, max: usize) -> Self {
        Self::new(min, Some(max))
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn accepts(&self, provided: usize) -> bool {
        provided >= self.min && self.max.map_or(true, |max| provided <= max)
    }
}

pub fn format_fn_arity(arity: FnArity) -> String {
    match (arity.min(), arity.max()) {
        (0, None) => "any".into(),
        (min, Some(max)) if min == max => max.to_string(),
        (min, Some(max)) => format!("{}..{}", min, max),
        (min, None) => format!("{}+", min),
    }
}

/// A host-provided callable: the evaluator applies it like any user
/// function, without knowing what is behind it.
pub struct NativeFn {
    func: Box<dyn Fn(&[Value]) -> Result<Value, SorrelError> + Send + Sync>,
    arity: FnArity,
    debug_name: Option<Arc<str>>,
}

impl NativeFn {
    pub fn new(
        arity: FnArity,
        func: impl Fn(&[Value]) -> Result<Value, SorrelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: Box::new(func),
            arity,
            debug_name: None,
        }
    }

    pub fn with_name(
        arity: FnArity,
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, SorrelError> + Send + Sync + 'static,
    ) -> Self {
        let mut nf = Self::new(arity, func);
        nf.debug_name = Some(name.into().into());
        nf
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, SorrelError> {
        (self.func)(args)
    }

    pub fn arity(&self) -> FnArity {
        self.arity
    }

    pub fn debug_name(&self) -> Option<&str> {
        self.debug_name.as_deref()
    }
}

/// One overload of a user function: the mandatory parameter names, the
/// optional rest binding, and the body forms evaluated as a `do`.
#[derive(Clone, Debug)]
pub struct LambdaClause {
    pub params: Vec<String>,
    pub rest: Option<String>,
    pub body: Vec<Value>,
}

impl LambdaClause {
    /// Fixed-arity clauses match exactly; variadic clauses match any
    /// surplus, including none.
    pub fn matches(&self, provided: usize) -> bool {
        match self.rest {
            None => provided == self.params.len(),
            Some(_) => provided >= self.params.len(),
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Symbol(String),
    Keyword(String),
    Vector(Vector<Value>),
    List(Vector<Value>),
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
    Tagged {
        tag: String,
        value: Box<Value>,
    },
    Quoted(Box<Value>),
    Func(Arc<NativeFn>),
    Lambda {
        clauses: Arc<Vec<LambdaClause>>,
        env: EnvRef,
        name: Option<String>,
    },
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Char(_) => ValueType::Char,
            Value::Str(_) => ValueType::Str,
            Value::Symbol(_) => ValueType::Symbol,
            Value::Keyword(_) => ValueType::Keyword,
            Value::Vector(_) => ValueType::Vector,
            Value::List(_) => ValueType::List,
            Value::Set(_) => ValueType::Set,
            Value::Map(_) => ValueType::Map,
            Value::Tagged { .. } => ValueType::Tagged,
            Value::Quoted(_) => ValueType::Quoted,
            Value::Func(_) | Value::Lambda { .. } => ValueType::Callable,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    pub fn native_fn(
        arity: FnArity,
        func: impl Fn(&[Value]) -> Result<Value, SorrelError> + Send + Sync + 'static,
    ) -> Self {
        Value::Func(Arc::new(NativeFn::new(arity, func)))
    }

    pub fn native_fn_with_name(
        name: impl Into<String>,
        arity: FnArity,
        func: impl Fn(&[Value]) -> Result<Value, SorrelError> + Send + Sync + 'static,
    ) -> Self {
        Value::Func(Arc::new(NativeFn::with_name(arity, name, func)))
    }

    pub fn tagged(tag: impl Into<String>, value: Value) -> Self {
        Value::Tagged {
            tag: tag.into(),
            value: Box::new(value),
        }
    }

    pub fn quoted(value: Value) -> Self {
        Value::Quoted(Box::new(value))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Func(_) | Value::Lambda { .. })
    }

    pub fn if_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn if_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn if_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn if_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn if_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn if_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn if_keyword(&self) -> Option<&str> {
        match self {
            Value::Keyword(s) => Some(s),
            _ => None,
        }
    }

    pub fn if_vector(&self) -> Option<&Vector<Value>> {
        match self {
            Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn if_list(&self) -> Option<&Vector<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn if_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn if_map(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn if_tagged(&self) -> Option<(&str, &Value)> {
        match self {
            Value::Tagged { tag, value } => Some((tag, value)),
            _ => None,
        }
    }

    pub fn if_quoted(&self) -> Option<&Value> {
        match self {
            Value::Quoted(inner) => Some(inner),
            _ => None,
        }
    }

    fn mismatch(&self, expected: ValueType) -> SorrelError {
        SorrelError::type_mismatch(
            expected.name(),
            self.type_name(),
            format_value(self, FormatMode::Readable),
        )
    }

    pub fn expect_bool(&self) -> Result<bool, SorrelError> {
        self.if_bool().ok_or_else(|| self.mismatch(ValueType::Bool))
    }

    pub fn expect_int(&self) -> Result<i64, SorrelError> {
        self.if_int().ok_or_else(|| self.mismatch(ValueType::Int))
    }

    pub fn expect_str(&self) -> Result<&str, SorrelError> {
        self.if_str().ok_or_else(|| self.mismatch(ValueType::Str))
    }

    pub fn expect_symbol(&self) -> Result<&str, SorrelError> {
        self.if_symbol()
            .ok_or_else(|| self.mismatch(ValueType::Symbol))
    }

    pub fn expect_vector(&self) -> Result<&Vector<Value>, SorrelError> {
        self.if_vector()
            .ok_or_else(|| self.mismatch(ValueType::Vector))
    }

    pub fn expect_list(&self) -> Result<&Vector<Value>, SorrelError> {
        self.if_list().ok_or_else(|| self.mismatch(ValueType::List))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Absolute tolerance, the way the notation defines float
            // equality; ordering and map keying stay exact.
            (Value::Float(a), Value::Float(b)) => (a - b).abs() < f64::EPSILON,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Tagged { tag: at, value: av },
                Value::Tagged { tag: bt, value: bv },
            ) => at == bt && av == bv,
            (Value::Quoted(a), Value::Quoted(b)) => a == b,
            // Callables never compare equal, not even to themselves.
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::Vector(a), Value::Vector(b)) => a.iter().cmp(b.iter()),
            (Value::List(a), Value::List(b)) => a.iter().cmp(b.iter()),
            (Value::Set(a), Value::Set(b)) => a.iter().cmp(b.iter()),
            (Value::Map(a), Value::Map(b)) => a.iter().cmp(b.iter()),
            (
                Value::Tagged { tag: at, value: av },
                Value::Tagged { tag: bt, value: bv },
            ) => at.cmp(bt).then_with(|| av.cmp(bv)),
            (Value::Quoted(a), Value::Quoted(b)) => a.cmp(b),
            // All callables tie at a single opaque rank.
            (a, b) if a.is_callable() && b.is_callable() => Ordering::Equal,
            _ => self.value_type().cmp(&other.value_type()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self, FormatMode::Readable))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self, FormatMode::Readable))
    }
}

#[cfg(test)]
mod tests {
    use super::{FnArity, Value, ValueType};
    use std::cmp::Ordering;

    fn callable() -> Value {
        Value::native_fn(FnArity::exact(0), |_| Ok(Value::Nil))
    }

    #[test]
    fn discriminator_rank_orders_across_variants() {
        let ranked = [
            Value::Nil,
            Value::Bool(false),
            Value::Int(99),
            Value::Float(-1.0),
            Value::Char('a'),
            Value::string("zzz"),
            Value::symbol("a"),
            Value::keyword("a"),
            Value::vector([Value::Int(1)]),
            Value::list([Value::Int(1)]),
            Value::set([Value::Int(1)]),
            Value::map([(Value::Int(1), Value::Int(2))]),
            Value::tagged("t", Value::Nil),
            Value::quoted(Value::Nil),
            callable(),
        ];
        for (i, a) in ranked.iter().enumerate() {
            for (j, b) in ranked.iter().enumerate() {
                let expected = i.cmp(&j);
                assert_eq!(a.cmp(b), expected, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn float_equality_uses_tolerance_but_ordering_is_exact() {
        let a = Value::Float(1.0);
        let b = Value::Float(1.0 + f64::EPSILON / 2.0);
        assert_eq!(a, b);
        assert_eq!(Value::Float(1.0).cmp(&Value::Float(2.0)), Ordering::Less);
    }

    #[test]
    fn int_and_float_never_mix() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn callables_are_never_equal_and_always_tie() {
        let f = callable();
        assert_ne!(f, f.clone());
        assert_eq!(f.cmp(&callable()), Ordering::Equal);
    }

    #[test]
    fn collections_compare_lexicographically() {
        let short = Value::vector([Value::Int(1)]);
        let long = Value::vector([Value::Int(1), Value::Int(2)]);
        assert_eq!(short.cmp(&long), Ordering::Less);

        let ab = Value::list([Value::symbol("a"), Value::symbol("b")]);
        let ac = Value::list([Value::symbol("a"), Value::symbol("c")]);
        assert_eq!(ab.cmp(&ac), Ordering::Less);
    }

    #[test]
    fn sets_deduplicate_and_iterate_in_total_order() {
        let set = Value::set([Value::Int(3), Value::Int(1), Value::Int(3), Value::Int(2)]);
        match &set {
            Value::Set(items) => {
                let ordered: Vec<i64> = items.iter().filter_map(|v| v.if_int()).collect();
                assert_eq!(ordered, vec![1, 2, 3]);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn accessors_borrow_or_decline() {
        let v = Value::string("hi");
        assert_eq!(v.if_str(), Some("hi"));
        assert_eq!(v.if_int(), None);
        assert_eq!(v.value_type(), ValueType::Str);

        let err = v.expect_int().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch: expected int, got str (\"hi\")"
        );
    }

    #[test]
    fn tagged_orders_by_tag_then_payload() {
        let a = Value::tagged("a", Value::Int(9));
        let b = Value::tagged("b", Value::Int(0));
        assert_eq!(a.cmp(&b), Ordering::Less);

        let a1 = Value::tagged("a", Value::Int(1));
        let a2 = Value::tagged("a", Value::Int(2));
        assert_eq!(a1.cmp(&a2), Ordering::Less);
    }
}
