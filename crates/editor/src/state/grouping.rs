//! Group/ungroup coordinate-frame transforms.
//!
//! Group frames are translation-only: a child's position is stored relative to
//! its group's position, while rotation and scale of the group are not composed
//! into the children. Ungrouping restores one level only.

use glam::DVec3;
use shared::{Shape, ShapeId, ShapeType, Vec3};

/// Arithmetic mean of a set of positions
pub fn centroid<'a>(positions: impl IntoIterator<Item = &'a Vec3>) -> Option<Vec3> {
    let (sum, count) = positions
        .into_iter()
        .fold((DVec3::ZERO, 0usize), |(sum, count), p| {
            (sum + DVec3::from_array(*p), count + 1)
        });
    if count == 0 {
        return None;
    }
    Some((sum / count as f64).to_array())
}

/// Express a world position in a group frame located at `origin`
pub fn to_group_local(world: Vec3, origin: Vec3) -> Vec3 {
    (DVec3::from_array(world) - DVec3::from_array(origin)).to_array()
}

/// Express a group-local position in world space
pub fn to_world(local: Vec3, origin: Vec3) -> Vec3 {
    (DVec3::from_array(local) + DVec3::from_array(origin)).to_array()
}

/// World position of `shapes[index]`, summing translations up its parent chain.
///
/// Dangling parents end the walk; a parent cycle stops after one visit per shape.
pub fn world_position(shapes: &[Shape], index: usize) -> Vec3 {
    let mut world = DVec3::from_array(shapes[index].position);
    let mut parent = shapes[index].parent_id.as_deref();
    let mut steps = 0;
    while let Some(pid) = parent {
        if steps >= shapes.len() {
            break;
        }
        let Some(p) = shapes.iter().find(|s| s.id == pid) else {
            break;
        };
        world += DVec3::from_array(p.position);
        parent = p.parent_id.as_deref();
        steps += 1;
    }
    world.to_array()
}

/// Wrap the shapes named by `ids` into a new group placed at the centroid of
/// their world positions.
///
/// Unknown ids are skipped; fewer than two members leaves `shapes` untouched.
/// Returns the id of the new group, which is appended to `shapes` at the top level.
pub fn group(shapes: &mut Vec<Shape>, ids: &[ShapeId], name: String) -> Option<ShapeId> {
    let members: Vec<usize> = shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| ids.contains(&s.id))
        .map(|(i, _)| i)
        .collect();
    if members.len() < 2 {
        return None;
    }

    let worlds: Vec<Vec3> = members.iter().map(|&i| world_position(shapes, i)).collect();
    let origin = centroid(&worlds)?;

    let mut group = Shape::new(ShapeType::Group, name);
    group.position = origin;
    let group_id = group.id.clone();

    for (&i, world) in members.iter().zip(worlds) {
        let member = &mut shapes[i];
        member.position = to_group_local(world, origin);
        member.parent_id = Some(group_id.clone());
    }
    shapes.push(group);

    Some(group_id)
}

/// Dissolve a group: direct children return to world space, the group is removed.
///
/// Returns the restored children ids, or `None` if `group_id` is not a group.
pub fn ungroup(shapes: &mut Vec<Shape>, group_id: &str) -> Option<Vec<ShapeId>> {
    let origin = shapes
        .iter()
        .find(|s| s.id == group_id && s.is_group())?
        .position;

    let mut children = Vec::new();
    for shape in shapes.iter_mut() {
        if shape.parent_id.as_deref() == Some(group_id) {
            shape.position = to_world(shape.position, origin);
            shape.parent_id = None;
            children.push(shape.id.clone());
        }
    }
    shapes.retain(|s| s.id != group_id);

    Some(children)
}
