//! The custom product configuration.
//!
//! Holds the customer's in-progress selections for the chocolate builder.
//! Every mutation produces a whole new configuration value; prices are
//! never stored here, always derived by the calculator.

use serde::{Deserialize, Serialize};

/// Maximum personalized-message length, in characters.
pub const MESSAGE_MAX_CHARS: usize = 100;

/// Base chocolate for the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaseChocolate {
    #[default]
    Milk,
    Dark,
    White,
}

impl BaseChocolate {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseChocolate::Milk => "milk",
            BaseChocolate::Dark => "dark",
            BaseChocolate::White => "white",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "milk" => Some(BaseChocolate::Milk),
            "dark" => Some(BaseChocolate::Dark),
            "white" => Some(BaseChocolate::White),
            _ => None,
        }
    }
}

/// Mix-in add-on.
///
/// `None` is the explicit "no add-ons" choice and is mutually exclusive
/// with every other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddOn {
    #[default]
    None,
    Nuts,
    Caramel,
    Berries,
}

impl AddOn {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddOn::None => "none",
            AddOn::Nuts => "nuts",
            AddOn::Caramel => "caramel",
            AddOn::Berries => "berries",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(AddOn::None),
            "nuts" => Some(AddOn::Nuts),
            "caramel" => Some(AddOn::Caramel),
            "berries" => Some(AddOn::Berries),
            _ => None,
        }
    }
}

/// Bar shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Round,
    Heart,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Round => "round",
            Shape::Heart => "heart",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" => Some(Shape::Square),
            "round" => Some(Shape::Round),
            "heart" => Some(Shape::Heart),
            _ => None,
        }
    }
}

/// Packaging option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    Standard,
    Gift,
    Premium,
    Eco,
}

impl Packaging {
    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::Standard => "standard",
            Packaging::Gift => "gift",
            Packaging::Premium => "premium",
            Packaging::Eco => "eco",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(Packaging::Standard),
            "gift" => Some(Packaging::Gift),
            "premium" => Some(Packaging::Premium),
            "eco" => Some(Packaging::Eco),
            _ => None,
        }
    }
}

/// The customer's current selections for a custom chocolate.
///
/// Invariant: `add_ons` never contains `AddOn::None` alongside another
/// value. All mutation goes through the `with_*`/`toggle_add_on` builders,
/// which preserve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    /// Base chocolate.
    pub base: BaseChocolate,
    /// Selected add-ons, in selection order.
    pub add_ons: Vec<AddOn>,
    /// Bar shape.
    pub shape: Shape,
    /// Packaging option.
    pub packaging: Packaging,
    /// Personalized message, up to [`MESSAGE_MAX_CHARS`] characters.
    pub message: String,
    /// Message style identifier. Cosmetic, no price effect.
    pub message_style: Option<String>,
}

impl Default for ProductConfiguration {
    fn default() -> Self {
        Self {
            base: BaseChocolate::Milk,
            add_ons: vec![AddOn::None],
            shape: Shape::Square,
            packaging: Packaging::Standard,
            message: String::new(),
            message_style: None,
        }
    }
}

impl ProductConfiguration {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base chocolate.
    pub fn with_base(mut self, base: BaseChocolate) -> Self {
        self.base = base;
        self
    }

    /// Replace the shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Replace the packaging.
    pub fn with_packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = packaging;
        self
    }

    /// Replace the message, truncated at [`MESSAGE_MAX_CHARS`] characters.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = match message.char_indices().nth(MESSAGE_MAX_CHARS) {
            Some((byte_index, _)) => message[..byte_index].to_string(),
            None => message,
        };
        self
    }

    /// Replace the message style.
    pub fn with_message_style(mut self, style: impl Into<String>) -> Self {
        self.message_style = Some(style.into());
        self
    }

    /// Toggle an add-on.
    ///
    /// Toggling `None` clears the set back to `{None}`. Toggling any other
    /// value removes it if present; otherwise adds it and drops `None`.
    pub fn toggle_add_on(mut self, add_on: AddOn) -> Self {
        if add_on == AddOn::None {
            self.add_ons = vec![AddOn::None];
            return self;
        }

        if self.add_ons.contains(&add_on) {
            self.add_ons.retain(|a| *a != add_on);
        } else {
            self.add_ons.retain(|a| *a != AddOn::None);
            self.add_ons.push(add_on);
        }
        self
    }

    /// Whether an add-on is currently selected.
    pub fn has_add_on(&self, add_on: AddOn) -> bool {
        self.add_ons.contains(&add_on)
    }

    /// The add-ons that carry a price (everything except `None`).
    pub fn priced_add_ons(&self) -> impl Iterator<Item = AddOn> + '_ {
        self.add_ons.iter().copied().filter(|a| *a != AddOn::None)
    }
}
