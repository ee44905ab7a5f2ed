//! Lock-on target selector
//!
//! Nearest-target выбор + one-shot hysteresis на переключение.
//! Селектор не ходит в мир сам: система собирает кандидатов и резолвит позиции.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LockOnConfig {
    pub search_radius: f32,
    /// |look.x| выше порога: запрос на переключение цели
    pub switch_threshold: f32,
    /// Aim point для целей без AimMarker: root + offset
    pub default_offset: Vec3,
}

impl Default for LockOnConfig {
    fn default() -> Self {
        Self {
            search_radius: 20.0,
            switch_threshold: 0.5,
            default_offset: Vec3::new(0.0, 1.2, 0.0),
        }
    }
}

impl LockOnConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("search_radius", self.search_radius)?;
        ensure_non_negative("switch_threshold", self.switch_threshold)?;
        Ok(())
    }
}

/// Designated aim point цели: отдельная entity, её `Transform`: world space.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AimMarker {
    pub marker: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum AimPointRef {
    Marker(Entity),
    RootOffset(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct LockOnSession {
    pub target: Entity,
    pub aim: AimPointRef,
    /// Переключение разрешено (re-arm, когда look падает ниже порога)
    pub switch_armed: bool,
    /// Root позиция цели на текущем тике
    pub root: Vec3,
    pub aim_point: Vec3,
}

/// Кандидат на захват (уже отфильтрован по команде и живости).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockOnCandidate {
    pub entity: Entity,
    pub position: Vec3,
    /// AimMarker entity + её позиция
    pub marker: Option<(Entity, Vec3)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOnUpdate {
    Unchanged,
    Acquired(Entity),
    Switched { from: Entity, to: Entity },
    Released(Entity),
}

/// Ближайший кандидат в радиусе. При равных дистанциях побеждает первый по порядку.
pub fn nearest_candidate<'a>(
    origin: Vec3,
    radius: f32,
    candidates: &'a [LockOnCandidate],
    exclude: Option<Entity>,
) -> Option<&'a LockOnCandidate> {
    let mut best: Option<(&LockOnCandidate, f32)> = None;
    for candidate in candidates {
        if Some(candidate.entity) == exclude {
            continue;
        }
        let distance = origin.distance(candidate.position);
        if distance > radius {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Lock-on состояние игрока (не больше одной сессии).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct LockOnSelector {
    session: Option<LockOnSession>,
    pub config: LockOnConfig,
}

impl LockOnSelector {
    pub fn new(config: LockOnConfig) -> Self {
        Self {
            session: None,
            config,
        }
    }

    pub fn session(&self) -> Option<&LockOnSession> {
        self.session.as_ref()
    }

    pub fn target(&self) -> Option<Entity> {
        self.session.map(|session| session.target)
    }

    /// `currentTarget()`: aim point текущей цели.
    pub fn current_target(&self) -> Option<Vec3> {
        self.session.map(|session| session.aim_point)
    }

    /// `toggle()`: release если залочено, иначе acquire ближайшего.
    pub fn toggle(&mut self, origin: Vec3, candidates: &[LockOnCandidate]) -> LockOnUpdate {
        if let Some(session) = self.session.take() {
            return LockOnUpdate::Released(session.target);
        }
        match nearest_candidate(origin, self.config.search_radius, candidates, None) {
            Some(candidate) => {
                self.lock(candidate, true);
                LockOnUpdate::Acquired(candidate.entity)
            }
            None => LockOnUpdate::Unchanged,
        }
    }

    /// `onTick(lookAxis)`: переключение на ближайшую *другую* цель.
    ///
    /// Одно отклонение стика = максимум одно переключение: после попытки
    /// (даже безуспешной) флаг взводится только когда |look.x| ≤ threshold.
    pub fn update_switch(
        &mut self,
        origin: Vec3,
        look_axis: Vec2,
        candidates: &[LockOnCandidate],
    ) -> LockOnUpdate {
        let radius = self.config.search_radius;
        let threshold = self.config.switch_threshold;
        let Some(session) = self.session.as_mut() else {
            return LockOnUpdate::Unchanged;
        };

        if look_axis.x.abs() <= threshold {
            session.switch_armed = true;
            return LockOnUpdate::Unchanged;
        }
        if !session.switch_armed {
            return LockOnUpdate::Unchanged;
        }
        session.switch_armed = false;

        let from = session.target;
        match nearest_candidate(origin, radius, candidates, Some(from)) {
            Some(candidate) => {
                self.lock(candidate, false);
                LockOnUpdate::Switched {
                    from,
                    to: candidate.entity,
                }
            }
            None => LockOnUpdate::Unchanged,
        }
    }

    /// Обновляет root/aim point. Если цель или её aim point исчезли: сессия очищается.
    pub fn refresh(&mut self, root: Option<Vec3>, marker: Option<Vec3>) -> LockOnUpdate {
        let Some(session) = self.session.as_mut() else {
            return LockOnUpdate::Unchanged;
        };
        let aim_point = match (session.aim, root) {
            (AimPointRef::Marker(_), Some(_)) => marker,
            (AimPointRef::RootOffset(offset), Some(root)) => Some(root + offset),
            (_, None) => None,
        };

        match (root, aim_point) {
            (Some(root), Some(aim_point)) => {
                session.root = root;
                session.aim_point = aim_point;
                LockOnUpdate::Unchanged
            }
            _ => {
                let target = session.target;
                self.session = None;
                LockOnUpdate::Released(target)
            }
        }
    }

    pub fn release(&mut self) -> LockOnUpdate {
        match self.session.take() {
            Some(session) => LockOnUpdate::Released(session.target),
            None => LockOnUpdate::Unchanged,
        }
    }

    fn lock(&mut self, candidate: &LockOnCandidate, switch_armed: bool) {
        let (aim, aim_point) = match candidate.marker {
            Some((marker, position)) => (AimPointRef::Marker(marker), position),
            None => (
                AimPointRef::RootOffset(self.config.default_offset),
                candidate.position + self.config.default_offset,
            ),
        };
        self.session = Some(LockOnSession {
            target: candidate.entity,
            aim,
            switch_armed,
            root: candidate.position,
            aim_point,
        });
    }
}
