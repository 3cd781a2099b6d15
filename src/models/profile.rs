//! Perfiles de usuario y asignación de roles

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Perfil que agrupa permisos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perfil {
    pub id: EntityId,
    pub nombre: String,
    pub descripcion: Option<String>,
    #[serde(default)]
    pub permisos: Vec<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rol {
    pub id: EntityId,
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Body de asignación/desasignación masiva
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesBulkRequest {
    pub rol_ids: Vec<EntityId>,
}

/// Diferencia entre los roles asignados y la selección actual
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignmentDiff {
    pub to_assign: Vec<EntityId>,
    pub to_unassign: Vec<EntityId>,
}

impl RoleAssignmentDiff {
    /// Comparar la selección con los roles asignados previamente.
    /// Los ids salen ordenados para que los requests sean deterministas.
    pub fn compute(previous: &[EntityId], selected: &[EntityId]) -> Self {
        let previous: BTreeSet<EntityId> = previous.iter().copied().collect();
        let selected: BTreeSet<EntityId> = selected.iter().copied().collect();

        Self {
            to_assign: selected.difference(&previous).copied().collect(),
            to_unassign: previous.difference(&selected).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_assign.is_empty() && self.to_unassign.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_assigns_and_unassigns() {
        let diff = RoleAssignmentDiff::compute(&[1, 2, 3], &[3, 4, 2, 5]);
        assert_eq!(diff.to_assign, vec![4, 5]);
        assert_eq!(diff.to_unassign, vec![1]);
    }

    #[test]
    fn test_same_selection_is_empty() {
        let diff = RoleAssignmentDiff::compute(&[2, 1], &[1, 2, 2]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let diff = RoleAssignmentDiff::compute(&[7, 8], &[]);
        assert!(diff.to_assign.is_empty());
        assert_eq!(diff.to_unassign, vec![7, 8]);
    }
}
