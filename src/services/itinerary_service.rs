use crate::models::attraction::{Attraction, DayPlan};
use crate::models::trip::Budget;

pub struct ItineraryService;

impl ItineraryService {
    /// Split attractions evenly over `days`.
    ///
    /// Each day gets `max(1, len / days)` consecutive places. Leftovers past
    /// `per_day * days` are dropped rather than appended to the last day, and
    /// days past the end of the list are emitted with no places. An empty
    /// list yields no days at all.
    pub fn partition(attractions: &[Attraction], days: u32, budget: Budget) -> Vec<DayPlan> {
        if attractions.is_empty() {
            return Vec::new();
        }

        let days = days.max(1) as usize;
        let per_day = (attractions.len() / days).max(1);

        (0..days)
            .map(|index| {
                let start = (index * per_day).min(attractions.len());
                let end = (start + per_day).min(attractions.len());
                let day_number = index + 1;

                DayPlan {
                    day: format!("Day {}", day_number),
                    places: attractions[start..end].to_vec(),
                    budget_tip: Self::budget_tip(budget, day_number),
                }
            })
            .collect()
    }

    pub fn budget_tip(budget: Budget, day_number: usize) -> String {
        format!(
            "Recommended {}-budget itinerary for Day {} (Approx spend: ₹{})",
            budget,
            day_number,
            budget.approx_daily_spend()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coordinate::Coordinate;
    use std::collections::HashSet;

    fn attractions(count: usize) -> Vec<Attraction> {
        (0..count)
            .map(|i| Attraction {
                name: format!("Place {}", i),
                address: "Somewhere".to_string(),
                coordinate: Coordinate::absent(),
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn test_even_split() {
        let plan = ItineraryService::partition(&attractions(18), 3, Budget::Low);

        assert_eq!(plan.len(), 3);
        for (i, day) in plan.iter().enumerate() {
            assert_eq!(day.places.len(), 6);
            assert_eq!(day.day, format!("Day {}", i + 1));
            assert!(day.budget_tip.contains("₹1500"));
            assert!(day.budget_tip.contains(&format!("Day {}", i + 1)));
        }
        assert_eq!(plan[1].places[0].name, "Place 6");
    }

    #[test]
    fn test_remainder_is_dropped() {
        let plan = ItineraryService::partition(&attractions(7), 3, Budget::Medium);

        assert_eq!(plan.len(), 3);
        let total: usize = plan.iter().map(|day| day.places.len()).sum();
        assert_eq!(total, 6);
        assert_eq!(plan[2].places.last().unwrap().name, "Place 5");
    }

    #[test]
    fn test_more_days_than_places() {
        let plan = ItineraryService::partition(&attractions(2), 4, Budget::High);

        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].places.len(), 1);
        assert_eq!(plan[1].places.len(), 1);
        assert!(plan[2].places.is_empty());
        assert!(plan[3].places.is_empty());
        assert!(plan[3].budget_tip.contains("₹7000"));
    }

    #[test]
    fn test_empty_list_yields_no_days() {
        assert!(ItineraryService::partition(&[], 5, Budget::Low).is_empty());
    }

    #[test]
    fn test_no_place_appears_twice() {
        let source = attractions(11);
        for days in 1..=12 {
            let plan = ItineraryService::partition(&source, days, Budget::Medium);
            let names: Vec<_> = plan
                .iter()
                .flat_map(|day| day.places.iter().map(|p| p.name.clone()))
                .collect();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len());
            assert!(names.len() <= source.len());
            assert_eq!(plan.len(), days as usize);
        }
    }

    #[test]
    fn test_budget_tip_text() {
        assert_eq!(
            ItineraryService::budget_tip(Budget::Medium, 2),
            "Recommended medium-budget itinerary for Day 2 (Approx spend: ₹3500)"
        );
    }
}
