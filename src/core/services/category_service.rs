use crate::core::errors::ExpenseError;
use crate::core::validation::normalize_category_name;
use crate::domain::CategoryRegistry;

use super::ServiceResult;

/// Validated mutations over the category registry.
///
/// Categories are addressed by position. None of these operations touch
/// expense records, so renamed or removed names may remain on old expenses.
pub struct CategoryService;

impl CategoryService {
    /// Normalizes `raw` and appends it, returning the stored name.
    pub fn add(registry: &mut CategoryRegistry, raw: &str) -> ServiceResult<String> {
        let name = Self::validate_name(raw)?;
        if registry.contains(&name) {
            return Err(ExpenseError::DuplicateCategory(name));
        }
        registry.push(name.clone());
        Ok(name)
    }

    /// Replaces the name at `index`, keeping its position.
    pub fn rename(registry: &mut CategoryRegistry, index: usize, raw: &str) -> ServiceResult<String> {
        let current = registry
            .get(index)
            .ok_or(ExpenseError::CategoryIndexOutOfRange(index))?;
        let name = Self::validate_name(raw)?;
        if name == current {
            return Err(ExpenseError::CategoryUnchanged);
        }
        if registry.contains(&name) {
            return Err(ExpenseError::DuplicateCategory(name));
        }
        registry.replace(index, name.clone());
        Ok(name)
    }

    /// Removes the name at `index`; later entries shift down by one.
    pub fn remove(registry: &mut CategoryRegistry, index: usize) -> ServiceResult<String> {
        registry
            .remove(index)
            .ok_or(ExpenseError::CategoryIndexOutOfRange(index))
    }

    pub fn list(registry: &CategoryRegistry) -> Vec<&str> {
        registry.iter().collect()
    }

    fn validate_name(raw: &str) -> ServiceResult<String> {
        let name = normalize_category_name(raw);
        if name.is_empty() {
            Err(ExpenseError::InvalidCategory)
        } else {
            Ok(name)
        }
    }
}
