//! Contribution categories.
//!
//! The set is closed: every contribution is exactly one of [`Category::ALL`].
//! Per-category views are stored in a [`ByCategory`], which always holds one
//! value for each category so no bucket can go missing.

use std::ops::{Index, IndexMut};

use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Category {
    #[sea_orm(string_value = "SALTY")]
    Salty,
    #[sea_orm(string_value = "SWEET")]
    Sweet,
    #[sea_orm(string_value = "DRINK")]
    Drink,
    #[sea_orm(string_value = "SIDE")]
    Side,
}

impl Category {
    /// Every category, in the order used by listings and alerts.
    pub const ALL: [Category; 4] = [
        Category::Salty,
        Category::Sweet,
        Category::Drink,
        Category::Side,
    ];

    /// Canonical code, as stored and sent on the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Category::Salty => "SALTY",
            Category::Sweet => "SWEET",
            Category::Drink => "DRINK",
            Category::Side => "SIDE",
        }
    }

    /// Label shown to people.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Salty => "Salé",
            Category::Sweet => "Sucré",
            Category::Drink => "Boisson",
            Category::Side => "Pain/Accomp.",
        }
    }

    /// Lower-case wording used inside alert sentences.
    #[must_use]
    pub const fn alert_label(self) -> &'static str {
        match self {
            Category::Salty => "salé",
            Category::Sweet => "sucré",
            Category::Drink => "boisson",
            Category::Side => "pain/accompagnement",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Category::Salty => "🧀",
            Category::Sweet => "🍰",
            Category::Drink => "🥤",
            Category::Side => "🥖",
        }
    }

    const fn index(self) -> usize {
        match self {
            Category::Salty => 0,
            Category::Sweet => 1,
            Category::Drink => 2,
            Category::Side => 3,
        }
    }

    /// Exact match on the canonical code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.code() == code)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// One value per category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByCategory<T>([T; 4]);

impl<T> ByCategory<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self(Category::ALL.map(&mut f))
    }

    pub fn get(&self, category: Category) -> &T {
        &self.0[category.index()]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category.index()]
    }

    /// Iterate in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ByCategory<U> {
        ByCategory(self.0.map(f))
    }

    /// The values in [`Category::ALL`] order.
    pub fn into_array(self) -> [T; 4] {
        self.0
    }
}

impl<T> Index<Category> for ByCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        self.get(category)
    }
}

impl<T> IndexMut<Category> for ByCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        self.get_mut(category)
    }
}
