//! Weapon definition decoder.
//!
//! The header is a large per-title struct. It starts with the internal and
//! display name pointers, both normally `FFFFFFFF`. Some files carry only six
//! `0xFF` bytes there, in which case the real header begins two bytes later;
//! the shift is applied before any numeric field is read.
//!
//! Numeric offsets come from [`WeaponLayout`](crate::definition::WeaponLayout).
//! An enum field beyond its known maximum means the offsets do not fit this
//! instance, so every numeric field is discarded rather than reported wrong.

use fastzone_common::scan;

use super::names::is_weapon_name;
use super::{bounded_end, DecodeCx};
use crate::asset::{WeaponAsset, WeaponConfidence};

const MAX_DISPLAY_NAME: usize = 128;

pub(crate) fn header(cx: &DecodeCx<'_>, offset: usize) -> Option<WeaponAsset> {
    let layout = cx.def.weapon;

    let shift = match scan::leading_run(cx.data, offset, 0xFF) {
        6 => 2,
        n if n >= 8 => 0,
        _ => return None,
    };
    let base = offset + shift;

    if !cx.ptr_at(base)?.is_inline() {
        return None;
    }
    let display_inline = cx.ptr_at(base + 4)?.is_inline();

    let header_end = base + layout.header_size;
    if header_end > cx.data.len() {
        return None;
    }

    let (internal, mut pos) = cx.str_at(header_end)?;
    if !is_weapon_name(internal) {
        return None;
    }
    let display_name = if display_inline {
        let (display, next) = cx.str_at(pos)?;
        if display.len() > MAX_DISPLAY_NAME || display.bytes().any(|b| b < 0x20) {
            return None;
        }
        pos = next;
        Some(display.to_string())
    } else {
        None
    };

    let fire_type = cx.u32_at(base + layout.fire_type)?;
    let weapon_class = cx.u32_at(base + layout.weapon_class)?;
    let penetration_type = cx.u32_at(base + layout.penetration_type)?;
    let impact_type = cx.u32_at(base + layout.impact_type)?;

    let in_range = fire_type <= layout.fire_type_max
        && weapon_class <= layout.weapon_class_max
        && penetration_type <= layout.penetration_type_max
        && impact_type <= layout.impact_type_max;

    let mut weapon = WeaponAsset {
        internal_name: internal.to_string(),
        display_name,
        damage: None,
        min_damage: None,
        clip_size: None,
        max_ammo: None,
        fire_type: None,
        weapon_class: None,
        penetration_type: None,
        impact_type: None,
        confidence: WeaponConfidence::Misaligned,
        alignment_shift: shift,
        start: offset,
        end: pos,
        end_estimated: false,
    };

    if in_range {
        weapon.damage = cx.i32_at(base + layout.damage);
        weapon.min_damage = cx.i32_at(base + layout.min_damage);
        weapon.clip_size = cx.i32_at(base + layout.clip_size);
        weapon.max_ammo = cx.i32_at(base + layout.max_ammo);
        weapon.fire_type = Some(fire_type);
        weapon.weapon_class = Some(weapon_class);
        weapon.penetration_type = Some(penetration_type);
        weapon.impact_type = Some(impact_type);
        weapon.confidence = WeaponConfidence::Confident;
    }

    Some(weapon)
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<WeaponAsset> {
    let mut weapon = header(cx, offset)?;
    let (end, end_estimated) = bounded_end(cx, weapon.end);
    weapon.end = end;
    weapon.end_estimated = end_estimated;
    Some(weapon)
}
