//! The five-step configuration wizard.
//!
//! A linear sequence of steps, each editing one facet of the
//! configuration. `next`/`previous` saturate at the ends; the reference
//! flow never skips steps, though nothing in the model prevents reaching
//! any step through repeated calls.

use crate::catalog::PricingCatalog;
use crate::configurator::{
    calculate, AddOn, BaseChocolate, Packaging, PriceBreakdown, ProductConfiguration, Shape,
};
use serde::{Deserialize, Serialize};

/// One step of the configuration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStep {
    /// Step 1: pick the base chocolate.
    #[default]
    Base,
    /// Step 2: pick the shape.
    Shape,
    /// Step 3: toggle add-ons.
    AddOns,
    /// Step 4: pick packaging.
    Packaging,
    /// Step 5: personalize the message.
    Message,
}

impl ConfigStep {
    /// 1-based step number, for progress display.
    pub fn number(&self) -> u8 {
        match self {
            ConfigStep::Base => 1,
            ConfigStep::Shape => 2,
            ConfigStep::AddOns => 3,
            ConfigStep::Packaging => 4,
            ConfigStep::Message => 5,
        }
    }

    /// The following step, or self at the last step.
    pub fn next(&self) -> Self {
        match self {
            ConfigStep::Base => ConfigStep::Shape,
            ConfigStep::Shape => ConfigStep::AddOns,
            ConfigStep::AddOns => ConfigStep::Packaging,
            ConfigStep::Packaging => ConfigStep::Message,
            ConfigStep::Message => ConfigStep::Message,
        }
    }

    /// The preceding step, or self at the first step.
    pub fn previous(&self) -> Self {
        match self {
            ConfigStep::Base => ConfigStep::Base,
            ConfigStep::Shape => ConfigStep::Base,
            ConfigStep::AddOns => ConfigStep::Shape,
            ConfigStep::Packaging => ConfigStep::AddOns,
            ConfigStep::Message => ConfigStep::Packaging,
        }
    }

    /// Whether this is the first step.
    pub fn is_first(&self) -> bool {
        *self == ConfigStep::Base
    }

    /// Whether this is the last step.
    pub fn is_last(&self) -> bool {
        *self == ConfigStep::Message
    }
}

/// Wizard state: the in-progress configuration plus a step cursor.
///
/// Each mutator builds a complete new configuration value and swaps it in,
/// so observers never see a half-applied update. Mutations are independent
/// of the cursor; the step only drives which facet the UI shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configurator {
    config: ProductConfiguration,
    step: ConfigStep,
}

impl Configurator {
    /// Start a fresh wizard at step 1 with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current configuration.
    pub fn config(&self) -> &ProductConfiguration {
        &self.config
    }

    /// The current step.
    pub fn step(&self) -> ConfigStep {
        self.step
    }

    /// Advance to the next step. No-op at step 5.
    pub fn next(&mut self) {
        self.step = self.step.next();
    }

    /// Go back to the previous step. No-op at step 1.
    pub fn previous(&mut self) {
        self.step = self.step.previous();
    }

    /// Set the base chocolate.
    pub fn set_base(&mut self, base: BaseChocolate) {
        self.config = self.config.clone().with_base(base);
    }

    /// Toggle an add-on; see
    /// [`ProductConfiguration::toggle_add_on`].
    pub fn toggle_add_on(&mut self, add_on: AddOn) {
        self.config = self.config.clone().toggle_add_on(add_on);
    }

    /// Set the shape.
    pub fn set_shape(&mut self, shape: Shape) {
        self.config = self.config.clone().with_shape(shape);
    }

    /// Set the packaging.
    pub fn set_packaging(&mut self, packaging: Packaging) {
        self.config = self.config.clone().with_packaging(packaging);
    }

    /// Set the message (truncated at the character limit).
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.config = self.config.clone().with_message(message);
    }

    /// Set the message style.
    pub fn set_message_style(&mut self, style: impl Into<String>) {
        self.config = self.config.clone().with_message_style(style);
    }

    /// Derive the price breakdown for the current configuration.
    ///
    /// Cheap enough to call after every mutation.
    pub fn pricing(&self, catalog: &PricingCatalog) -> PriceBreakdown {
        calculate(&self.config, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        let mut step = ConfigStep::Base;
        let mut numbers = vec![step.number()];
        while !step.is_last() {
            step = step.next();
            numbers.push(step.number());
        }
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_next_saturates_at_last_step() {
        let mut wizard = Configurator::new();
        for _ in 0..10 {
            wizard.next();
        }
        assert_eq!(wizard.step(), ConfigStep::Message);
        wizard.next();
        assert_eq!(wizard.step(), ConfigStep::Message);
    }

    #[test]
    fn test_previous_saturates_at_first_step() {
        let mut wizard = Configurator::new();
        wizard.previous();
        assert_eq!(wizard.step(), ConfigStep::Base);

        wizard.next();
        wizard.previous();
        wizard.previous();
        assert_eq!(wizard.step(), ConfigStep::Base);
    }

    #[test]
    fn test_mutators_apply_to_configuration() {
        let mut wizard = Configurator::new();
        wizard.set_base(BaseChocolate::Dark);
        wizard.set_shape(Shape::Heart);
        wizard.toggle_add_on(AddOn::Nuts);
        wizard.set_packaging(Packaging::Gift);
        wizard.set_message("Hi!");
        wizard.set_message_style("script");

        let config = wizard.config();
        assert_eq!(config.base, BaseChocolate::Dark);
        assert_eq!(config.shape, Shape::Heart);
        assert_eq!(config.add_ons, vec![AddOn::Nuts]);
        assert_eq!(config.packaging, Packaging::Gift);
        assert_eq!(config.message, "Hi!");
        assert_eq!(config.message_style.as_deref(), Some("script"));
    }

    #[test]
    fn test_mutation_allowed_regardless_of_step() {
        // The cursor gates nothing; only the reference UI is sequential
        let mut wizard = Configurator::new();
        assert_eq!(wizard.step(), ConfigStep::Base);
        wizard.set_message("early message");
        assert_eq!(wizard.config().message, "early message");
    }

    #[test]
    fn test_pricing_reflects_current_state() {
        use crate::catalog::PricingCatalog;

        let catalog = PricingCatalog::fallback();
        let mut wizard = Configurator::new();
        let before = wizard.pricing(&catalog);

        wizard.toggle_add_on(AddOn::Nuts);
        let after = wizard.pricing(&catalog);

        assert!(after.add_ons_total.amount_cents > before.add_ons_total.amount_cents);
        assert_eq!(
            after.subtotal - before.subtotal,
            after.add_ons_total - before.add_ons_total
        );
    }
}
