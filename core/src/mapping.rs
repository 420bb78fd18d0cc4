//! Bidirectional transform between display space and field space.

use crate::{DisplayPoint, FieldDimensions, FieldPoint};

/// Pure linear mapping between display coordinates and field coordinates.
///
/// Display space grows downward along Y while field space grows upward, so the
/// vertical axis is inverted before scaling. Inputs are not range checked:
/// points outside the display rectangle extrapolate linearly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    dimensions: FieldDimensions,
}

impl CoordinateMapper {
    /// Creates a mapper bound to the provided dimensions.
    #[must_use]
    pub const fn new(dimensions: FieldDimensions) -> Self {
        Self { dimensions }
    }

    /// Dimensions the mapper was constructed with.
    #[must_use]
    pub const fn dimensions(&self) -> FieldDimensions {
        self.dimensions
    }

    /// Converts a display-space point into field units.
    #[must_use]
    pub fn to_field(&self, point: DisplayPoint) -> FieldPoint {
        let dims = &self.dimensions;
        FieldPoint::new(
            point.x / dims.display_width() * dims.field_width(),
            (dims.display_height() - point.y) / dims.display_height() * dims.field_height(),
        )
    }

    /// Converts a field-space point into display units.
    #[must_use]
    pub fn to_display(&self, point: FieldPoint) -> DisplayPoint {
        let dims = &self.dimensions;
        DisplayPoint::new(
            point.x / dims.field_width() * dims.display_width(),
            dims.display_height() - point.y / dims.field_height() * dims.display_height(),
        )
    }

    /// Evenly spaced axis ticks along both edges of the field.
    ///
    /// Produces `divisions + 1` ticks per axis, horizontal ticks first. Vertical
    /// ticks run top to bottom, so their field values descend. Zero divisions
    /// yield no ticks.
    #[must_use]
    pub fn axis_ticks(&self, divisions: u32) -> Vec<AxisTick> {
        if divisions == 0 {
            return Vec::new();
        }

        let dims = &self.dimensions;
        let steps = f64::from(divisions);
        let mut ticks = Vec::with_capacity(2 * (divisions as usize + 1));

        for i in 0..=divisions {
            let i = f64::from(i);
            ticks.push(AxisTick {
                axis: TickAxis::Horizontal,
                display_offset: dims.display_width() / steps * i,
                field_value: dims.field_width() / steps * i,
            });
        }
        for i in 0..=divisions {
            let i = f64::from(i);
            ticks.push(AxisTick {
                axis: TickAxis::Vertical,
                display_offset: dims.display_height() / steps * i,
                field_value: dims.field_height() - dims.field_height() / steps * i,
            });
        }

        ticks
    }
}

/// Edge of the field that an [`AxisTick`] labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickAxis {
    /// Tick along the horizontal (X) axis.
    Horizontal,
    /// Tick along the vertical (Y) axis.
    Vertical,
}

/// Single labelled position along one axis of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisTick {
    /// Axis the tick belongs to.
    pub axis: TickAxis,
    /// Offset of the tick along its axis in display units.
    pub display_offset: f64,
    /// Field-space value printed at the tick.
    pub field_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const TOLERANCE: f64 = 1e-6;

    fn reference_mapper() -> CoordinateMapper {
        CoordinateMapper::new(FieldDimensions::new(800.0, 600.0, 14.0, 8.0).expect("valid"))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn maps_reference_points_to_field_units() {
        let mapper = reference_mapper();

        let centre = mapper.to_field(DisplayPoint::new(400.0, 300.0));
        assert_close(centre.x, 7.0);
        assert_close(centre.y, 4.0);

        let origin = mapper.to_field(DisplayPoint::new(0.0, 600.0));
        assert_close(origin.x, 0.0);
        assert_close(origin.y, 0.0);

        let far_corner = mapper.to_field(DisplayPoint::new(800.0, 0.0));
        assert_close(far_corner.x, 14.0);
        assert_close(far_corner.y, 8.0);
    }

    #[test]
    fn out_of_bounds_points_extrapolate() {
        let mapper = reference_mapper();
        let field = mapper.to_field(DisplayPoint::new(-400.0, 900.0));

        assert_close(field.x, -7.0);
        assert_close(field.y, -4.0);
    }

    #[test]
    fn random_points_round_trip_in_both_directions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_f1e1_d000_0001);

        for _ in 0..500 {
            let dimensions = FieldDimensions::new(
                rng.gen_range(1.0..4000.0),
                rng.gen_range(1.0..4000.0),
                rng.gen_range(0.1..100.0),
                rng.gen_range(0.1..100.0),
            )
            .expect("positive dimensions");
            let mapper = CoordinateMapper::new(dimensions);

            let display = DisplayPoint::new(
                rng.gen_range(-dimensions.display_width()..2.0 * dimensions.display_width()),
                rng.gen_range(-dimensions.display_height()..2.0 * dimensions.display_height()),
            );
            let back = mapper.to_display(mapper.to_field(display));
            let scale = dimensions.field_width() / dimensions.display_width();
            assert!((back.x - display.x).abs() * scale < TOLERANCE);
            let scale = dimensions.field_height() / dimensions.display_height();
            assert!((back.y - display.y).abs() * scale < TOLERANCE);

            let field = FieldPoint::new(
                rng.gen_range(0.0..dimensions.field_width()),
                rng.gen_range(0.0..dimensions.field_height()),
            );
            let back = mapper.to_field(mapper.to_display(field));
            assert_close(back.x, field.x);
            assert_close(back.y, field.y);
        }
    }

    #[test]
    fn axis_ticks_span_both_edges() {
        let ticks = reference_mapper().axis_ticks(8);
        assert_eq!(ticks.len(), 18);

        let horizontal: Vec<_> = ticks
            .iter()
            .filter(|tick| tick.axis == TickAxis::Horizontal)
            .collect();
        assert_close(horizontal[0].field_value, 0.0);
        assert_close(horizontal[8].display_offset, 800.0);
        assert_close(horizontal[8].field_value, 14.0);

        let vertical: Vec<_> = ticks
            .iter()
            .filter(|tick| tick.axis == TickAxis::Vertical)
            .collect();
        assert_close(vertical[0].field_value, 8.0);
        assert_close(vertical[4].display_offset, 300.0);
        assert_close(vertical[4].field_value, 4.0);
        assert_close(vertical[8].field_value, 0.0);
    }

    #[test]
    fn zero_divisions_produce_no_ticks() {
        assert!(reference_mapper().axis_ticks(0).is_empty());
    }
}
