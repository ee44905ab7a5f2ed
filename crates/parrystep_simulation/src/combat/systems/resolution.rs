//! Hit resolution pipeline (Resolution set)
//!
//! HitEvent → классификация (parry > guard > hit) → Health → реакция state machine
//! → HitResolved / EntityDied → feedback (hitstop, camera impulse, VFX).

use bevy::prelude::*;

use crate::ai::EnemyBrain;
use crate::combat::feedback::{CameraImpulseRequested, EffectSpawnRequested, HitFeedbackConfig};
use crate::combat::hit::{
    classify_hit, resolve_damage, DefenseStance, EntityDied, HitEvent, HitOutcome, HitResolved,
};
use crate::components::{AnimationRequests, Health};
use crate::player::PlayerController;
use crate::time::TimeDilation;

type CombatantQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Transform,
        &'static mut Health,
        &'static mut AnimationRequests,
        Option<&'static mut PlayerController>,
        Option<&'static mut EnemyBrain>,
    ),
>;

/// Система: обработка всех HitEvent этого тика
///
/// Игнорируются (без outcome): self-hit, мёртвый/отсутствующий attacker или defender.
/// Поэтому второй летальный удар по трупу: no-op, EntityDied приходит ровно один раз.
pub fn resolve_hits(
    mut hits: EventReader<HitEvent>,
    mut combatants: CombatantQuery,
    feedback: Res<HitFeedbackConfig>,
    mut dilation: ResMut<TimeDilation>,
    mut resolved: EventWriter<HitResolved>,
    mut died: EventWriter<EntityDied>,
    mut impulses: EventWriter<CameraImpulseRequested>,
    mut effects: EventWriter<EffectSpawnRequested>,
) {
    for hit in hits.read() {
        if hit.attacker == hit.defender {
            crate::log(&format!("⚠️ Hit: self-hit {:?} ignored", hit.attacker));
            continue;
        }

        let Some(attacker_position) = combatants
            .get(hit.attacker)
            .ok()
            .filter(|(_, health, _, _, _)| health.is_alive())
            .map(|(transform, _, _, _, _)| transform.translation)
        else {
            crate::log(&format!(
                "⚠️ Hit: attacker {:?} missing or dead, ignored",
                hit.attacker
            ));
            continue;
        };

        let Ok((defender_transform, mut health, mut anim, mut controller, mut brain)) =
            combatants.get_mut(hit.defender)
        else {
            crate::log(&format!("⚠️ Hit: defender {:?} missing, ignored", hit.defender));
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let stance = controller
            .as_deref()
            .map_or(DefenseStance::Exposed, PlayerController::defense_stance);
        let guard_ratio = controller
            .as_deref()
            .map_or(0.0, |controller| controller.config.guard_damage_ratio);
        let outcome = classify_hit(stance);
        let damage_applied = resolve_damage(outcome, hit.damage, guard_ratio);

        let mut killed = false;
        if damage_applied > 0 {
            let report = health.take_damage(damage_applied);
            if report.is_dead {
                killed = true;
                if let Some(controller) = controller.as_deref_mut() {
                    controller.on_killed(&mut anim);
                }
                if let Some(brain) = brain.as_deref_mut() {
                    brain.on_killed(&mut anim);
                }
            } else if outcome == HitOutcome::Hit {
                let away = defender_transform.translation - attacker_position;
                let knockback_dir = Vec3::new(away.x, 0.0, away.z).normalize_or_zero();
                if let Some(controller) = controller.as_deref_mut() {
                    controller.on_hit(damage_applied, &mut anim);
                }
                if let Some(brain) = brain.as_deref_mut() {
                    brain.on_damaged(damage_applied, knockback_dir, &mut anim);
                }
            }
        }

        crate::log(&format!(
            "⚔️ Hit: {:?} → {:?} {:?} ({} of {} dmg, HP {}/{})",
            hit.attacker, hit.defender, outcome, damage_applied, hit.damage, health.current, health.max
        ));

        resolved.write(HitResolved {
            attacker: hit.attacker,
            defender: hit.defender,
            outcome,
            damage_applied,
            impact_point: hit.impact_point,
        });

        if killed {
            crate::log_info(&format!("💀 {:?} killed by {:?}", hit.defender, hit.attacker));
            died.write(EntityDied {
                entity: hit.defender,
                killer: Some(hit.attacker),
            });
        }

        match outcome {
            HitOutcome::Parried => {
                if let Ok((_, _, mut attacker_anim, _, Some(mut attacker_brain))) =
                    combatants.get_mut(hit.attacker)
                {
                    attacker_brain.on_parried(&mut attacker_anim);
                }
                if dilation.request_freeze(feedback.parry_hitstop_duration) {
                    crate::log(&format!(
                        "⏸️ Hitstop: parry freeze {:.2}s",
                        feedback.parry_hitstop_duration
                    ));
                }
            }
            HitOutcome::Guarded if damage_applied == 0 => {}
            HitOutcome::Guarded | HitOutcome::Hit => {
                if dilation.request_freeze(feedback.hitstop_duration) {
                    crate::log(&format!("⏸️ Hitstop: freeze {:.2}s", feedback.hitstop_duration));
                }
                impulses.write(CameraImpulseRequested {
                    magnitude: feedback.camera_impulse,
                });
                effects.write(EffectSpawnRequested {
                    effect: feedback.hit_effect.clone(),
                    position: hit.impact_point,
                    ttl: feedback.effect_ttl,
                });
            }
        }
    }
}
