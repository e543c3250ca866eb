use crate::utils::error::RangeViolation;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct AirplaneType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct AirplaneTypeCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Seat layout of an airplane. Rows and seats are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SeatGrid {
    #[sqlx(rename = "seat_rows")]
    pub rows: i64,
    pub seats_in_row: i64,
}

impl SeatGrid {
    pub fn capacity(&self) -> i64 {
        self.rows * self.seats_in_row
    }

    /// Checks a requested seat position against the grid bounds.
    ///
    /// Returns one violation per out-of-bounds coordinate, so a request
    /// with both a bad row and a bad seat reports both at once.
    pub fn check_position(&self, ticket_index: usize, row: i64, seat: i64) -> Vec<RangeViolation> {
        let mut violations = Vec::new();
        for (got, field, max) in [(row, "row", self.rows), (seat, "seat", self.seats_in_row)] {
            if !(1..=max).contains(&got) {
                violations.push(RangeViolation {
                    ticket_index,
                    field: field.to_string(),
                    min: 1,
                    max,
                    got,
                });
            }
        }
        violations
    }
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct AirplaneCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 1))]
    pub rows: i64,
    #[validate(range(min = 1))]
    pub seats_in_row: i64,
    /// Id of the airplane type.
    pub airplane_type: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct AirplaneListItem {
    pub id: i64,
    pub name: String,
    pub airplane_type: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct AirplaneDetail {
    pub id: i64,
    pub name: String,
    pub airplane_type: String,
    #[sqlx(rename = "seat_rows")]
    pub rows: i64,
    pub seats_in_row: i64,
    pub capacity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_rows_times_seats() {
        let grid = SeatGrid {
            rows: 3,
            seats_in_row: 4,
        };
        assert_eq!(grid.capacity(), 12);
    }

    #[test]
    fn position_inside_grid_has_no_violations() {
        let grid = SeatGrid {
            rows: 3,
            seats_in_row: 4,
        };
        assert!(grid.check_position(0, 1, 1).is_empty());
        assert!(grid.check_position(0, 3, 4).is_empty());
    }

    #[test]
    fn row_past_last_is_reported_with_bounds() {
        let grid = SeatGrid {
            rows: 3,
            seats_in_row: 4,
        };
        let violations = grid.check_position(0, 4, 2);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "row");
        assert_eq!(violations[0].min, 1);
        assert_eq!(violations[0].max, 3);
        assert_eq!(violations[0].got, 4);
    }

    #[test]
    fn zero_row_and_zero_seat_both_reported() {
        let grid = SeatGrid {
            rows: 3,
            seats_in_row: 4,
        };
        let violations = grid.check_position(2, 0, 0);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "row");
        assert_eq!(violations[1].field, "seat");
        assert!(violations.iter().all(|v| v.ticket_index == 2));
    }
}
