use alloc::vec::Vec;

use serde::Serialize;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Score,
    GhostEaten,
    PowerPellet,
    Death,
}

/// Short-lived decoration for the renderer, stamped with the session clock.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub position: GridPosition,
    pub value: Option<u32>,
    pub created_at: f64,
    pub duration_ms: f64,
}

impl VisualEffect {
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.created_at >= self.duration_ms
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Effects {
    items: Vec<VisualEffect>,
}

impl Effects {
    pub fn push(&mut self, effect: VisualEffect) {
        self.items.push(effect);
    }

    pub fn prune(&mut self, now_ms: f64) {
        self.items.retain(|effect| !effect.is_expired(now_ms));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualEffect> + '_ {
        self.items.iter()
    }
}
