//! Axiom sets for category theory and basic algebra
//!
//! Morphisms are first-order terms; `comp(g, f)` is "g after f", `dom`
//! and `cod` give the source and target object, `id(x)` is the identity
//! on `x`. Everything here is plain formula text ready for [`crate::synthesize`].

/// Concepts with a fixed axiom set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Category,
    Functor,
    NaturalTransformation,
    Monoid,
    Group,
}

impl Concept {
    /// Names accepted by [`Concept::from_name`]
    pub const NAMES: [&'static str; 5] = [
        "category",
        "functor",
        "natural-transformation",
        "monoid",
        "group",
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "category" => Some(Concept::Category),
            "functor" => Some(Concept::Functor),
            "natural-transformation" => Some(Concept::NaturalTransformation),
            "monoid" => Some(Concept::Monoid),
            "group" => Some(Concept::Group),
            _ => None,
        }
    }
}

/// Axioms of a category
pub fn category_axioms() -> Vec<String> {
    vec![
        "all f (morphism(f) -> object(dom(f)) & object(cod(f)))".to_string(),
        "all x (object(x) -> morphism(id(x)) & dom(id(x)) = x & cod(id(x)) = x)".to_string(),
        "all f all g (morphism(f) & morphism(g) & cod(f) = dom(g) -> \
         morphism(comp(g,f)) & dom(comp(g,f)) = dom(f) & cod(comp(g,f)) = cod(g))"
            .to_string(),
        "all f (morphism(f) -> comp(f,id(dom(f))) = f & comp(id(cod(f)),f) = f)".to_string(),
        "all f all g all h (morphism(f) & morphism(g) & morphism(h) & \
         cod(f) = dom(g) & cod(g) = dom(h) -> comp(h,comp(g,f)) = comp(comp(h,g),f))"
            .to_string(),
    ]
}

/// Axioms stating that `name` is a functor, written as `name_obj` on
/// objects and `name_mor` on morphisms
pub fn functor_axioms(name: &str) -> Vec<String> {
    let obj = format!("{name}_obj");
    let mor = format!("{name}_mor");
    vec![
        format!("all x (object(x) -> object({obj}(x)))"),
        format!("all f (morphism(f) -> morphism({mor}(f)))"),
        format!("all f (morphism(f) -> dom({mor}(f)) = {obj}(dom(f)) & cod({mor}(f)) = {obj}(cod(f)))"),
        format!("all x (object(x) -> {mor}(id(x)) = id({obj}(x)))"),
        format!(
            "all f all g (morphism(f) & morphism(g) & cod(f) = dom(g) -> \
             {mor}(comp(g,f)) = comp({mor}(g),{mor}(f)))"
        ),
    ]
}

/// Naturality of `component` as a transformation from functor `f` to `g`
pub fn natural_transformation_condition(f: &str, g: &str, component: &str) -> Vec<String> {
    vec![
        format!("all x (object(x) -> morphism({component}(x)))"),
        format!(
            "all x (object(x) -> dom({component}(x)) = {f}_obj(x) & cod({component}(x)) = {g}_obj(x))"
        ),
        format!(
            "all h (morphism(h) -> \
             comp({component}(cod(h)),{f}_mor(h)) = comp({g}_mor(h),{component}(dom(h))))"
        ),
    ]
}

/// Monoid axioms over `*` with unit `e`
pub fn monoid_axioms() -> Vec<String> {
    vec![
        "all x all y all z ((x * y) * z = x * (y * z))".to_string(),
        "all x (e * x = x)".to_string(),
        "all x (x * e = x)".to_string(),
    ]
}

/// Group axioms: monoid plus two-sided inverse `inv`
pub fn group_axioms() -> Vec<String> {
    let mut axioms = monoid_axioms();
    axioms.push("all x (inv(x) * x = e)".to_string());
    axioms.push("all x (x * inv(x) = e)".to_string());
    axioms
}

/// Compose a path of morphisms given in application order.
///
/// `["f", "g", "h"]` becomes `comp(h,comp(g,f))`. An empty path is `None`.
pub fn compose_path(path: &[String]) -> Option<String> {
    let mut iter = path.iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, m| format!("comp({m},{acc})")))
}

/// Premises and conclusion stating that two paths between the same objects
/// commute.
///
/// Returns `None` when either path is empty.
pub fn commutativity_problem(
    path_a: &[String],
    path_b: &[String],
    start: &str,
    end: &str,
) -> Option<(Vec<String>, String)> {
    let lhs = compose_path(path_a)?;
    let rhs = compose_path(path_b)?;

    let mut premises = vec![format!("object({start})"), format!("object({end})")];
    for path in [path_a, path_b] {
        for m in path {
            let fact = format!("morphism({m})");
            if !premises.contains(&fact) {
                premises.push(fact);
            }
        }
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            premises.push(format!("dom({first}) = {start}"));
            premises.push(format!("cod({last}) = {end}"));
        }
        for pair in path.windows(2) {
            premises.push(format!("cod({}) = dom({})", pair[0], pair[1]));
        }
    }
    premises.dedup();

    Some((premises, format!("{lhs} = {rhs}")))
}
