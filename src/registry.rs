//! Car and car-class names
//!
//! Result records list each class with the IDs of its member cars, but car names only arrive
//! with individual result lines (or live session info). The registry therefore accepts class
//! membership first and names later, without ever losing either.
//!
//! Lookups never fail: an unknown ID yields an empty name.

use crate::schema::ResultCarClass;
use crate::types::{CarClassId, CarId};
use std::collections::{BTreeMap, BTreeSet};

/// One car class and its member cars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarClass {
    pub car_class_id: CarClassId,
    pub name: String,
    pub short_name: String,
    /// Member cars in ID order; the name is empty until backfilled.
    pub cars: BTreeMap<CarId, String>,
}

impl CarClass {
    /// Long name, or the short name when the long one is unknown.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.short_name } else { &self.name }
    }
}

/// Registry of car classes and car names seen across all ingested results.
#[derive(Debug, Clone, Default)]
pub struct CarClassRegistry {
    classes: BTreeMap<CarClassId, CarClass>,
    car_names: BTreeMap<CarId, String>,
}

impl CarClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed classes and their member car IDs.
    ///
    /// Merges into existing entries: known names are only replaced by non-empty ones, and
    /// membership only grows.
    pub fn register_classes<'a>(&mut self, defs: impl IntoIterator<Item = &'a ResultCarClass>) {
        for def in defs {
            let class = self.classes.entry(def.car_class_id).or_insert_with(|| CarClass {
                car_class_id: def.car_class_id,
                ..Default::default()
            });

            if !def.name.is_empty() {
                class.name.clone_from(&def.name);
            }
            if !def.short_name.is_empty() {
                class.short_name.clone_from(&def.short_name);
            }

            for member in &def.cars_in_class {
                let known = self.car_names.get(&member.car_id).cloned().unwrap_or_default();
                class.cars.entry(member.car_id).or_insert(known);
            }
        }
    }

    /// Backfill a car name into the global table and every class listing the car.
    ///
    /// An empty name is ignored.
    pub fn set_car_name(&mut self, car_id: CarId, name: &str) {
        if name.is_empty() {
            return;
        }

        self.car_names.insert(car_id, name.to_string());
        for class in self.classes.values_mut() {
            if let Some(slot) = class.cars.get_mut(&car_id) {
                *slot = name.to_string();
            }
        }
    }

    pub fn car_name(&self, car_id: CarId) -> &str {
        self.car_names.get(&car_id).map(String::as_str).unwrap_or_default()
    }

    /// Sorted, distinct, non-empty names of the given cars.
    pub fn car_names_driven(&self, car_ids: impl IntoIterator<Item = CarId>) -> Vec<String> {
        let names: BTreeSet<&str> = car_ids
            .into_iter()
            .map(|id| self.car_name(id))
            .filter(|name| !name.is_empty())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn class(&self, car_class_id: CarClassId) -> Option<&CarClass> {
        self.classes.get(&car_class_id)
    }

    /// Display name of a class, empty if unknown.
    pub fn class_name(&self, car_class_id: CarClassId) -> &str {
        self.class(car_class_id).map(CarClass::display_name).unwrap_or_default()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = CarClassId> + '_ {
        self.classes.keys().copied()
    }
}
