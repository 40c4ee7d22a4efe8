use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::Condition;

/// A rendered expression with its placeholder maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedExpression {
    pub expression: String,
    pub names: BTreeMap<String, String>,
    pub values: BTreeMap<String, Value>,
}

/// Renders a single condition with a fresh placeholder context.
pub fn render(condition: &Condition) -> RenderedExpression {
    let mut context = ExpressionContext::new();
    let expression = context.render(condition);
    let (names, values) = context.into_parts();
    RenderedExpression {
        expression,
        names,
        values,
    }
}

/// Placeholder allocator shared by every expression of one request.
///
/// A query carries a key condition, a filter and a projection that all draw
/// from the same `ExpressionAttributeNames` / `ExpressionAttributeValues`
/// maps, so they have to be rendered through one context.
#[derive(Debug, Default)]
pub struct ExpressionContext {
    names: BTreeMap<String, String>,
    name_lookup: HashMap<String, String>,
    values: BTreeMap<String, Value>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a condition, allocating placeholders as needed.
    pub fn render(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Compare {
                attribute,
                op,
                value,
            } => {
                let name = self.name(attribute);
                let value = self.value(value.clone());
                format!("{name} {} {value}", op.symbol())
            }
            Condition::Between {
                attribute,
                low,
                high,
            } => {
                let name = self.name(attribute);
                let low = self.value(low.clone());
                let high = self.value(high.clone());
                format!("{name} BETWEEN {low} AND {high}")
            }
            Condition::BeginsWith { attribute, prefix } => {
                let name = self.name(attribute);
                let prefix = self.value(Value::String(prefix.clone()));
                format!("begins_with({name}, {prefix})")
            }
            Condition::Contains { attribute, value } => {
                let name = self.name(attribute);
                let value = self.value(value.clone());
                format!("contains({name}, {value})")
            }
            Condition::In { attribute, values } => {
                let name = self.name(attribute);
                let placeholders: Vec<String> =
                    values.iter().map(|v| self.value(v.clone())).collect();
                format!("{name} IN ({})", placeholders.join(", "))
            }
            Condition::Exists(attribute) => {
                format!("attribute_exists({})", self.name(attribute))
            }
            Condition::NotExists(attribute) => {
                format!("attribute_not_exists({})", self.name(attribute))
            }
            Condition::And(left, right) => {
                let left = self.render_grouped(left, |c| matches!(c, Condition::Or(..)));
                let right = self.render_grouped(right, |c| matches!(c, Condition::Or(..)));
                format!("{left} AND {right}")
            }
            Condition::Or(left, right) => {
                let left = self.render(left);
                let right = self.render(right);
                format!("{left} OR {right}")
            }
            Condition::Not(inner) => {
                let inner = self.render_grouped(inner, |c| {
                    matches!(c, Condition::And(..) | Condition::Or(..))
                });
                format!("NOT {inner}")
            }
        }
    }

    /// Renders a projection list, one name placeholder per attribute.
    pub fn render_projection<S: AsRef<str>>(&mut self, attributes: &[S]) -> String {
        attributes
            .iter()
            .map(|attribute| self.name(attribute.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, Value>) {
        (self.names, self.values)
    }

    fn render_grouped(&mut self, condition: &Condition, needs_parens: fn(&Condition) -> bool) -> String {
        let rendered = self.render(condition);
        if needs_parens(condition) {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    fn name(&mut self, attribute: &str) -> String {
        if let Some(placeholder) = self.name_lookup.get(attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), attribute.to_string());
        self.name_lookup
            .insert(attribute.to_string(), placeholder.clone());
        placeholder
    }

    fn value(&mut self, value: Value) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_comparison() {
        let rendered = render(&Condition::ge("score", 10));

        assert_eq!(rendered.expression, "#n0 >= :v0");
        assert_eq!(rendered.names.get("#n0").unwrap(), "score");
        assert_eq!(rendered.values.get(":v0").unwrap(), &json!(10));
    }

    #[test]
    fn test_render_key_condition_shares_name_placeholders() {
        let condition = Condition::eq("pk", "USER#1")
            & Condition::between("sk", "2024-01-01", "2024-12-31");

        let rendered = render(&condition);

        assert_eq!(rendered.expression, "#n0 = :v0 AND #n1 BETWEEN :v1 AND :v2");
        assert_eq!(rendered.names.len(), 2);
        assert_eq!(rendered.values.len(), 3);
    }

    #[test]
    fn test_render_functions() {
        assert_eq!(
            render(&Condition::begins_with("sk", "ORDER#")).expression,
            "begins_with(#n0, :v0)"
        );
        assert_eq!(
            render(&Condition::contains("tags", "red")).expression,
            "contains(#n0, :v0)"
        );
        assert_eq!(
            render(&Condition::exists("email")).expression,
            "attribute_exists(#n0)"
        );
        assert_eq!(
            render(&Condition::not_exists("email")).expression,
            "attribute_not_exists(#n0)"
        );
        assert_eq!(
            render(&Condition::is_in("status", ["open", "held"])).expression,
            "#n0 IN (:v0, :v1)"
        );
    }

    #[test]
    fn test_render_groups_or_under_and() {
        let condition = Condition::eq("a", 1) & (Condition::eq("b", 2) | Condition::eq("c", 3));

        assert_eq!(
            render(&condition).expression,
            "#n0 = :v0 AND (#n1 = :v1 OR #n2 = :v2)"
        );
    }

    #[test]
    fn test_render_not_groups_compound_conditions() {
        let simple = !Condition::eq("a", 1);
        let compound = !(Condition::eq("a", 1) & Condition::eq("b", 2));

        assert_eq!(render(&simple).expression, "NOT #n0 = :v0");
        assert_eq!(render(&compound).expression, "NOT (#n0 = :v0 AND #n1 = :v1)");
    }

    #[test]
    fn test_context_shares_placeholders_across_expressions() {
        let mut context = ExpressionContext::new();

        let key = context.render(&Condition::eq("pk", "x"));
        let filter = context.render(&(Condition::gt("total", 5) & Condition::eq("pk", "y")));
        let projection = context.render_projection(&["pk", "total", "name"]);

        assert_eq!(key, "#n0 = :v0");
        assert_eq!(filter, "#n1 > :v1 AND #n0 = :v2");
        assert_eq!(projection, "#n0, #n1, #n2");
        assert_eq!(context.names().len(), 3);
        assert_eq!(context.values().len(), 3);
    }
}
