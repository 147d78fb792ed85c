//! Scratch state of a trip being booked.

use chrono::NaiveDateTime;

use crate::model::{Coordinate, CoordinatePair, FareQuote, FareSource, LocationField, ResolvedArea};

/// Free text of a location field and the area it resolved to, kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationInput {
    text: String,
    resolved: Option<ResolvedArea>,
}

impl LocationInput {
    /// Text currently shown in the field.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Area the text resolved to, if the user picked a suggestion.
    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedArea> {
        self.resolved.as_ref()
    }

    /// Replace the text. Any change drops the resolution; returns whether one was dropped.
    pub(crate) fn set_text(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        self.text = text;
        self.resolved.take().is_some()
    }

    /// Adopt a suggestion: text and resolution change together.
    pub(crate) fn select(&mut self, area: ResolvedArea) {
        self.text.clone_from(&area.label);
        self.resolved = Some(area);
    }
}

/// Trip parameters collected on the booking step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pickup: LocationInput,
    destination: LocationInput,
    pickup_time: Option<NaiveDateTime>,
    fare: f64,
    distance: f64,
    fare_source: FareSource,
    quote: Option<FareQuote>,
}

impl BookingDraft {
    /// One of the two location fields.
    #[must_use]
    pub fn location(&self, field: LocationField) -> &LocationInput {
        match field {
            LocationField::Pickup => &self.pickup,
            LocationField::Destination => &self.destination,
        }
    }

    pub(crate) fn location_mut(&mut self, field: LocationField) -> &mut LocationInput {
        match field {
            LocationField::Pickup => &mut self.pickup,
            LocationField::Destination => &mut self.destination,
        }
    }

    /// Pickup text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.pickup.text()
    }

    /// Destination text.
    #[must_use]
    pub fn destination(&self) -> &str {
        self.destination.text()
    }

    /// Resolved pickup position.
    #[must_use]
    pub fn source_coord(&self) -> Option<Coordinate> {
        self.pickup.resolved().map(ResolvedArea::coordinate)
    }

    /// Resolved destination position.
    #[must_use]
    pub fn dest_coord(&self) -> Option<Coordinate> {
        self.destination.resolved().map(ResolvedArea::coordinate)
    }

    /// Both endpoints, once both fields are resolved.
    #[must_use]
    pub fn coordinate_pair(&self) -> Option<CoordinatePair> {
        Some(CoordinatePair {
            source: self.source_coord()?,
            destination: self.dest_coord()?,
        })
    }

    /// Requested pickup time.
    #[must_use]
    pub fn pickup_time(&self) -> Option<NaiveDateTime> {
        self.pickup_time
    }

    pub(crate) fn set_pickup_time(&mut self, time: Option<NaiveDateTime>) {
        self.pickup_time = time;
    }

    /// Fare for the current coordinates, zero when unknown.
    #[must_use]
    pub fn fare(&self) -> f64 {
        self.fare
    }

    /// Distance for the current coordinates, zero when unknown.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Origin of the current fare.
    #[must_use]
    pub fn fare_source(&self) -> FareSource {
        self.fare_source
    }

    /// Full quote behind the fare, when it was priced by the backend.
    #[must_use]
    pub fn quote(&self) -> Option<&FareQuote> {
        self.quote.as_ref()
    }

    pub(crate) fn apply_quote(&mut self, quote: FareQuote) {
        self.fare = quote.total_fare;
        self.distance = quote.distance;
        self.fare_source = FareSource::Quoted;
        self.quote = Some(quote);
    }

    pub(crate) fn apply_fallback(&mut self, fare: f64, distance: f64) {
        self.fare = fare;
        self.distance = distance;
        self.fare_source = FareSource::Fallback;
        self.quote = None;
    }

    pub(crate) fn clear_fare(&mut self) {
        self.fare = 0.0;
        self.distance = 0.0;
        self.fare_source = FareSource::None;
        self.quote = None;
    }

    /// Both locations resolved and a positive fare.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.coordinate_pair().is_some() && self.fare > 0.0
    }

    /// Whether abandoning the draft would lose user input.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.source().is_empty() || !self.destination().is_empty() || self.fare.abs() > f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaId;

    fn gulshan() -> ResolvedArea {
        ResolvedArea {
            id: AreaId("g".into()),
            label: "Gulshan, Dhaka".into(),
            city: "Dhaka".into(),
            address: String::new(),
            latitude: 23.79,
            longitude: 90.41,
        }
    }

    #[test]
    fn editing_text_after_selection_drops_the_resolution() {
        let mut input = LocationInput::default();
        input.select(gulshan());
        assert_eq!(input.text(), "Gulshan, Dhaka");
        assert!(input.resolved().is_some());

        assert!(input.set_text("Gulshan, Dhak".into()));
        assert!(input.resolved().is_none());
    }

    #[test]
    fn setting_identical_text_keeps_the_resolution() {
        let mut input = LocationInput::default();
        input.select(gulshan());
        assert!(!input.set_text("Gulshan, Dhaka".into()));
        assert!(input.resolved().is_some());
    }

    #[test]
    fn draft_needs_both_ends_and_a_fare() {
        let mut draft = BookingDraft::default();
        draft.location_mut(LocationField::Pickup).select(gulshan());
        draft.apply_fallback(500.0, 10.0);
        assert!(!draft.is_submittable());

        draft.location_mut(LocationField::Destination).select(gulshan());
        assert!(draft.is_submittable());

        draft.clear_fare();
        assert!(!draft.is_submittable());
        assert_eq!(draft.fare_source(), FareSource::None);
    }

    #[test]
    fn any_typed_text_counts_as_input() {
        let mut draft = BookingDraft::default();
        assert!(!draft.is_dirty());

        draft.location_mut(LocationField::Pickup).set_text("  ".into());
        assert!(draft.is_dirty());

        draft.location_mut(LocationField::Pickup).set_text(String::new());
        assert!(!draft.is_dirty());
    }
}
