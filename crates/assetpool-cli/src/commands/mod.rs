//! CLI command implementations.

pub mod export;
pub mod list;
pub mod pools;

use anyhow::{Result, bail};
use assetpool::{AssetRegistry, AssetSchema};

use crate::cli::Selection;

/// Resolve the selected asset types, in registry order.
///
/// An empty selection means every registered type. Unknown names and groups
/// are reported rather than silently ignored.
pub fn select<'a>(
    registry: &'a AssetRegistry,
    selection: &Selection,
) -> Result<Vec<&'a AssetSchema>> {
    if selection.assets.is_empty() && selection.groups.is_empty() {
        return Ok(registry.iter().collect());
    }

    let mut chosen = Vec::new();
    for name in &selection.assets {
        chosen.push(registry.get(name)?);
    }
    for group in &selection.groups {
        let before = chosen.len();
        chosen.extend(registry.by_group(group));
        if chosen.len() == before {
            bail!("No asset types in group '{}'", group);
        }
    }

    Ok(registry
        .iter()
        .filter(|schema| chosen.iter().any(|c| std::ptr::eq(*c, *schema)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(schemas: &[&AssetSchema]) -> Vec<String> {
        schemas.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_empty_selection_is_everything() {
        let registry = AssetRegistry::builtin();
        let selected = select(&registry, &Selection::default()).unwrap();
        assert_eq!(names(&selected), ["physpreset", "ttf"]);
    }

    #[test]
    fn test_select_by_name_and_group() {
        let registry = AssetRegistry::builtin();

        let by_name = Selection {
            assets: vec!["TTF".to_string()],
            groups: Vec::new(),
        };
        assert_eq!(names(&select(&registry, &by_name).unwrap()), ["ttf"]);

        let by_group = Selection {
            assets: Vec::new(),
            groups: vec!["physics".to_string()],
        };
        assert_eq!(names(&select(&registry, &by_group).unwrap()), ["physpreset"]);
    }

    #[test]
    fn test_overlapping_selection_is_deduplicated() {
        let registry = AssetRegistry::builtin();
        let both = Selection {
            assets: vec!["ttf".to_string(), "physpreset".to_string()],
            groups: vec!["RawFile".to_string()],
        };
        assert_eq!(names(&select(&registry, &both).unwrap()), ["physpreset", "ttf"]);
    }

    #[test]
    fn test_unknown_selection_fails() {
        let registry = AssetRegistry::builtin();

        let unknown_asset = Selection {
            assets: vec!["xmodel".to_string()],
            groups: Vec::new(),
        };
        assert!(select(&registry, &unknown_asset).is_err());

        let unknown_group = Selection {
            assets: Vec::new(),
            groups: vec!["Weapons".to_string()],
        };
        assert!(select(&registry, &unknown_group).is_err());
    }
}
