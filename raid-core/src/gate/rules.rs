//! The canonical ordered requirement rules.
use crate::constants::{
    ALLOWED_DARTS, BLOWPIPE_DARTS_NEEDED, BLOWPIPE_SCALES_NEEDED, HELM_CHARGES_PER_HOUR,
    ITEM_BLOWPIPE, ITEM_BREW, ITEM_RESTORE, ITEM_RUNE_POUCH, ITEM_SANFEW, ITEM_SERPENTINE_HELM,
    MELEE_REQUIRED_ARMOUR, MELEE_REQUIRED_WEAPONS, MIN_SKILL_LEVEL, MIN_STYLE_SCORE,
    RANGE_AMMO_NEEDED, REQUIRED_ARROWS, REQUIRED_RANGE_WEAPONS,
};
use crate::items::ItemBank;
use crate::participant::Skill;
use crate::stats::CombatStyle;

use super::{RequirementRule, RuleContext};

/// Supplies every participant must keep in the bank.
#[must_use]
pub fn minimum_supplies() -> ItemBank {
    ItemBank::new()
        .with(ITEM_BREW, 10)
        .with(ITEM_RESTORE, 5)
        .with(ITEM_RUNE_POUCH, 1)
}

pub const REQUIREMENT_RULES: [RequirementRule; 11] = [
    RequirementRule {
        name: "Blowpipe",
        check: check_blowpipe,
        describe: describe_blowpipe,
    },
    RequirementRule {
        name: "Range gear",
        check: check_range_gear,
        describe: describe_range_gear,
    },
    RequirementRule {
        name: "Range weapon",
        check: check_range_weapon,
        describe: describe_range_weapon,
    },
    RequirementRule {
        name: "Range ammo",
        check: check_range_ammo,
        describe: describe_range_ammo,
    },
    RequirementRule {
        name: "Melee gear",
        check: check_melee_gear,
        describe: describe_melee_gear,
    },
    RequirementRule {
        name: "Melee weapon",
        check: check_melee_weapon,
        describe: describe_melee_weapon,
    },
    RequirementRule {
        name: "Melee armour",
        check: check_melee_armour,
        describe: describe_melee_armour,
    },
    RequirementRule {
        name: "Mage gear",
        check: check_mage_gear,
        describe: describe_mage_gear,
    },
    RequirementRule {
        name: "Stats",
        check: check_stats,
        describe: describe_stats,
    },
    RequirementRule {
        name: "Supplies",
        check: check_supplies,
        describe: describe_supplies,
    },
    RequirementRule {
        name: "Poison protection",
        check: check_poison_protection,
        describe: describe_poison_protection,
    },
];

fn check_blowpipe(ctx: &RuleContext<'_>) -> Option<String> {
    let loadout = &ctx.participant.blowpipe;
    let dart = match loadout.dart.as_deref() {
        Some(dart)
            if ctx.participant.owns(ITEM_BLOWPIPE)
                && loadout.scales > 0
                && loadout.dart_quantity > 0 =>
        {
            dart
        }
        _ => {
            return Some(format!(
                "Needs {ITEM_BLOWPIPE} (with darts and scales equipped) in bank"
            ));
        }
    };
    if loadout.dart_quantity < BLOWPIPE_DARTS_NEEDED {
        return Some(format!("Needs {BLOWPIPE_DARTS_NEEDED}x darts"));
    }
    if loadout.scales < BLOWPIPE_SCALES_NEEDED {
        return Some(format!("Needs {BLOWPIPE_SCALES_NEEDED}x scales"));
    }
    if !ALLOWED_DARTS.contains(&dart) {
        return Some("Darts are too weak".to_string());
    }
    None
}

fn describe_blowpipe() -> String {
    format!(
        "at least {BLOWPIPE_DARTS_NEEDED}x darts and {BLOWPIPE_SCALES_NEEDED} scales, using one of: {}, loaded in a {ITEM_BLOWPIPE}",
        ALLOWED_DARTS.join(", ")
    )
}

fn style_gear(ctx: &RuleContext<'_>, style: CombatStyle) -> Option<String> {
    (ctx.score.style(style) < MIN_STYLE_SCORE).then(|| format!("Terrible {} gear", style.label()))
}

fn check_range_gear(ctx: &RuleContext<'_>) -> Option<String> {
    style_gear(ctx, CombatStyle::Range)
}

fn describe_range_gear() -> String {
    format!("a range gear score of at least {MIN_STYLE_SCORE}%")
}

fn check_range_weapon(ctx: &RuleContext<'_>) -> Option<String> {
    (!ctx.participant.setups.range.has_any_equipped(&REQUIRED_RANGE_WEAPONS)).then(|| {
        format!(
            "Must have one of these equipped: {}",
            REQUIRED_RANGE_WEAPONS.join(", ")
        )
    })
}

fn describe_range_weapon() -> String {
    format!(
        "one of these in the range setup: {}",
        REQUIRED_RANGE_WEAPONS.join(", ")
    )
}

fn check_range_ammo(ctx: &RuleContext<'_>) -> Option<String> {
    let Some(ammo) = ctx
        .participant
        .setups
        .range
        .ammo
        .as_ref()
        .filter(|ammo| ammo.quantity >= RANGE_AMMO_NEEDED)
    else {
        return Some(format!("Need {RANGE_AMMO_NEEDED} arrows equipped"));
    };
    if REQUIRED_ARROWS.contains(&ammo.item.as_str()) {
        return None;
    }
    Some(format!(
        "Need one of these arrows equipped: {}",
        REQUIRED_ARROWS.join(", ")
    ))
}

fn describe_range_ammo() -> String {
    format!(
        "at least {RANGE_AMMO_NEEDED}x of one of these arrows equipped: {}",
        REQUIRED_ARROWS.join(", ")
    )
}

fn check_melee_gear(ctx: &RuleContext<'_>) -> Option<String> {
    style_gear(ctx, CombatStyle::Melee)
}

fn describe_melee_gear() -> String {
    format!("a melee gear score of at least {MIN_STYLE_SCORE}%")
}

fn check_melee_weapon(ctx: &RuleContext<'_>) -> Option<String> {
    (!ctx.participant.setups.melee.has_any_equipped(&MELEE_REQUIRED_WEAPONS)).then(|| {
        format!(
            "Need one of these weapons in your melee setup: {}",
            MELEE_REQUIRED_WEAPONS.join(", ")
        )
    })
}

fn describe_melee_weapon() -> String {
    format!(
        "one of these weapons in the melee setup: {}",
        MELEE_REQUIRED_WEAPONS.join(", ")
    )
}

fn check_melee_armour(ctx: &RuleContext<'_>) -> Option<String> {
    (!ctx.participant.setups.melee.has_any_equipped(&MELEE_REQUIRED_ARMOUR)).then(|| {
        format!(
            "Need one of these in your melee setup: {}",
            MELEE_REQUIRED_ARMOUR.join(", ")
        )
    })
}

fn describe_melee_armour() -> String {
    format!(
        "one of these capes in the melee setup: {}",
        MELEE_REQUIRED_ARMOUR.join(", ")
    )
}

fn check_mage_gear(ctx: &RuleContext<'_>) -> Option<String> {
    style_gear(ctx, CombatStyle::Mage)
}

fn describe_mage_gear() -> String {
    format!("a mage gear score of at least {MIN_STYLE_SCORE}%")
}

fn skill_requirements() -> String {
    Skill::ALL
        .iter()
        .map(|skill| format!("{MIN_SKILL_LEVEL} {}", skill.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_stats(ctx: &RuleContext<'_>) -> Option<String> {
    Skill::ALL
        .iter()
        .any(|skill| ctx.participant.skill(*skill) < MIN_SKILL_LEVEL)
        .then(|| format!("You need: {}.", skill_requirements()))
}

fn describe_stats() -> String {
    skill_requirements()
}

fn check_supplies(ctx: &RuleContext<'_>) -> Option<String> {
    let required = minimum_supplies();
    (!ctx.participant.bank.has_all(&required))
        .then(|| format!("You need at least this much supplies: {required}."))
}

fn describe_supplies() -> String {
    format!("at least {}", minimum_supplies())
}

fn check_poison_protection(ctx: &RuleContext<'_>) -> Option<String> {
    let participant = ctx.participant;
    let charged_helm = participant.setups.melee.has_equipped(ITEM_SERPENTINE_HELM)
        && u64::from(participant.helm_charges) >= HELM_CHARGES_PER_HOUR;
    (!participant.owns(ITEM_SANFEW) && !charged_helm).then(|| {
        format!(
            "You need a charged {ITEM_SERPENTINE_HELM} equipped in melee, or a {ITEM_SANFEW} in your bank."
        )
    })
}

fn describe_poison_protection() -> String {
    format!("a charged {ITEM_SERPENTINE_HELM} equipped in melee, or a {ITEM_SANFEW} in the bank")
}
