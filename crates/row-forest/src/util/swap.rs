use crate::types::Node;

use super::{get_l, get_p, get_r, set_l, set_p, set_r};

/// Which side of `parent` holds `child`, or `None` when `child` is a root.
fn side<N: Node>(arena: &[N], parent: Option<u32>, child: u32) -> Option<(u32, bool)> {
    parent.map(|p| (p, get_l(arena, p) == Some(child)))
}

fn put<N: Node>(arena: &mut [N], slot: Option<(u32, bool)>, v: u32) {
    match slot {
        Some((p, true)) => set_l(arena, p, Some(v)),
        Some((p, false)) => set_r(arena, p, Some(v)),
        None => {}
    }
}

fn adopt<N: Node>(arena: &mut [N], child: Option<u32>, parent: u32) {
    if let Some(c) = child {
        set_p(arena, c, Some(parent));
    }
}

/// Exchanges the tree positions of `x` and `y`, returning the new root.
///
/// Only links move; the node payloads stay with their slots so that
/// outstanding handles keep naming the same rows. Colors and aggregates
/// are left as they were and must be fixed up by the caller.
pub fn swap<N: Node>(arena: &mut [N], root: u32, x: u32, y: u32) -> u32 {
    if x == y {
        return root;
    }
    // Normalise so that `x` is the upper node when the two are adjacent.
    let (x, y) = if get_p(arena, x) == Some(y) { (y, x) } else { (x, y) };

    let xp = get_p(arena, x);
    let xl = get_l(arena, x);
    let xr = get_r(arena, x);
    let yp = get_p(arena, y);
    let yl = get_l(arena, y);
    let yr = get_r(arena, y);
    let x_slot = side(arena, xp, x);
    let y_slot = side(arena, yp, y);
    let adjacent = yp == Some(x);

    put(arena, x_slot, y);
    set_p(arena, y, xp);

    if adjacent {
        if xl == Some(y) {
            set_l(arena, y, Some(x));
            set_r(arena, y, xr);
            adopt(arena, xr, y);
        } else {
            set_r(arena, y, Some(x));
            set_l(arena, y, xl);
            adopt(arena, xl, y);
        }
        set_p(arena, x, Some(y));
    } else {
        set_l(arena, y, xl);
        set_r(arena, y, xr);
        adopt(arena, xl, y);
        adopt(arena, xr, y);
        put(arena, y_slot, x);
        set_p(arena, x, yp);
    }

    set_l(arena, x, yl);
    set_r(arena, x, yr);
    adopt(arena, yl, x);
    adopt(arena, yr, x);

    if xp.is_none() {
        y
    } else if yp.is_none() {
        x
    } else {
        root
    }
}
