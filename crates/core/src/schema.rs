//! Product parameter schemas and flavor catalogs.

use std::collections::BTreeMap;

use crate::condition::ParameterCondition;
use crate::quota::Quota;
use crate::value::Value;

/// One configurable field of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSchema {
    /// Unique key of the field within the product.
    pub variable: String,
    /// Display label.
    pub name: String,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// Advanced parameters belong to the advanced-options step; all
    /// others to the cluster-configuration step.
    pub advanced: bool,
    pub required: bool,
    pub condition: Option<ParameterCondition>,
}

impl ParameterSchema {
    /// A plain, optional, non-advanced parameter.
    pub fn new(variable: impl Into<String>) -> Self {
        let variable = variable.into();
        ParameterSchema {
            name: variable.clone(),
            variable,
            description: None,
            default: None,
            advanced: false,
            required: false,
            condition: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_condition(mut self, condition: ParameterCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Flavor name -> resources consumed by one node of that flavor.
pub type FlavorCatalog = BTreeMap<String, Quota>;

/// A product the wizard can provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterSchema>,
    pub flavors: FlavorCatalog,
    /// Node role -> flavor name, for roles whose flavor is fixed by the
    /// product rather than chosen through a companion parameter.
    pub default_flavors: BTreeMap<String, String>,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Product {
            id,
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            flavors: FlavorCatalog::new(),
            default_flavors: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_flavor(mut self, name: impl Into<String>, unit: Quota) -> Self {
        self.flavors.insert(name.into(), unit);
        self
    }

    pub fn with_default_flavor(mut self, role: impl Into<String>, flavor: impl Into<String>) -> Self {
        self.default_flavors.insert(role.into(), flavor.into());
        self
    }

    pub fn parameter(&self, variable: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.variable == variable)
    }

    /// Parameters shown on the basic (`advanced == false`) or advanced step.
    pub fn parameters_where(&self, advanced: bool) -> impl Iterator<Item = &ParameterSchema> {
        self.parameters.iter().filter(move |p| p.advanced == advanced)
    }

    /// Malformed condition nodes, per parameter variable.
    pub fn condition_issues(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .filter_map(|p| p.condition.as_ref().map(|c| (p, c)))
            .flat_map(|(p, c)| {
                c.expression
                    .issues()
                    .into_iter()
                    .map(move |reason| (p.variable.clone(), reason))
            })
            .collect()
    }
}

/// Products keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog(pub BTreeMap<u64, Product>);

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog(BTreeMap::new())
    }

    pub fn get(&self, id: u64) -> Option<&Product> {
        self.0.get(&id)
    }

    pub fn insert(&mut self, product: Product) {
        self.0.insert(product.id, product);
    }

    /// True when some product declares `variable` as a parameter.
    pub fn declares(&self, variable: &str) -> bool {
        self.0.values().any(|p| p.parameter(variable).is_some())
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        ProductCatalog(iter.into_iter().map(|p| (p.id, p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    #[test]
    fn parameters_split_by_step() {
        let product = Product::new(1, "OpenShift")
            .with_parameter(ParameterSchema::new("num_web_nodes").with_default(2))
            .with_parameter(ParameterSchema::new("ssh_key").advanced());
        let basic: Vec<_> = product.parameters_where(false).map(|p| &p.variable).collect();
        let adv: Vec<_> = product.parameters_where(true).map(|p| &p.variable).collect();
        assert_eq!(basic, vec!["num_web_nodes"]);
        assert_eq!(adv, vec!["ssh_key"]);
    }

    #[test]
    fn condition_issues_name_the_parameter() {
        let product = Product::new(1, "p").with_parameter(
            ParameterSchema::new("x").with_condition(ParameterCondition {
                expression: Condition::Malformed {
                    reason: "leaf missing 'op'".into(),
                },
                message: "bad".into(),
            }),
        );
        assert_eq!(
            product.condition_issues(),
            vec![("x".to_string(), "leaf missing 'op'".to_string())]
        );
    }

    #[test]
    fn catalog_lookup() {
        let catalog: ProductCatalog = vec![
            Product::new(1, "a").with_parameter(ParameterSchema::new("foo")),
            Product::new(2, "b"),
        ]
        .into_iter()
        .collect();
        assert!(catalog.get(2).is_some());
        assert!(catalog.declares("foo"));
        assert!(!catalog.declares("bar"));
    }
}
