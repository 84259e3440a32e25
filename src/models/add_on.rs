use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Surcharge {
    /// Fixed amount added once per stay.
    Flat(f64),
    /// Percentage of the room subtotal.
    Percent(f64),
}

/// Optional service a guest can add to the stay.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AddOn {
    pub id: String,
    pub label: String,
    pub surcharge: Surcharge,
    /// Application order within a quote, lowest first.
    pub position: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddOnCatalog {
    add_ons: Vec<AddOn>,
}

impl AddOnCatalog {
    pub fn new(mut add_ons: Vec<AddOn>) -> Self {
        add_ons.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Self { add_ons }
    }

    pub fn with_fees(late_checkout: f64, airport_pickup: f64, breakfast_percent: f64) -> Self {
        Self::new(vec![
            AddOn {
                id: "late_checkout".to_string(),
                label: "Late checkout".to_string(),
                surcharge: Surcharge::Flat(late_checkout),
                position: 10,
            },
            AddOn {
                id: "airport_pickup".to_string(),
                label: "Airport pickup".to_string(),
                surcharge: Surcharge::Flat(airport_pickup),
                position: 20,
            },
            AddOn {
                id: "breakfast".to_string(),
                label: "Breakfast included".to_string(),
                surcharge: Surcharge::Percent(breakfast_percent),
                position: 30,
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add-ons in application order.
    pub fn iter(&self) -> impl Iterator<Item = &AddOn> {
        self.add_ons.iter()
    }
}

impl Default for AddOnCatalog {
    fn default() -> Self {
        Self::with_fees(150.0, 75.0, 10.0)
    }
}
