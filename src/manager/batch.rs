//! Bulk hide/unhide over explicit sets, spatial queries and the whole registry
//!
//! Every bulk operation maps the single-object operation over its candidates
//! in order. Failures are skipped; the result lists only the objects that
//! actually changed state.

use tracing::info;

use super::ObjectManager;
use crate::objects::{ObjectId, Vec3};
use crate::world::{SpatialQuery, World};

impl ObjectManager {
    /// Hide each object in `objects`
    pub fn hide_map_objects<W, I>(&mut self, world: &mut W, objects: I, update_path_graph: bool) -> Vec<ObjectId>
    where
        W: World + ?Sized,
        I: IntoIterator<Item = ObjectId>,
    {
        objects
            .into_iter()
            .filter_map(|id| self.hide_map_object(&mut *world, id, update_path_graph))
            .collect()
    }

    /// Hide every map object within `radius` of `center`.
    ///
    /// The query is a vertical cylinder unless `limit_height` asks for a sphere.
    pub fn hide_map_objects_in_radius<W>(
        &mut self,
        world: &mut W,
        center: Vec3,
        radius: f64,
        limit_height: bool,
        update_path_graph: bool,
    ) -> Vec<ObjectId>
    where
        W: World + ?Sized,
    {
        let candidates = candidates(&*world, center, radius, limit_height);
        let hidden = self.hide_map_objects(world, candidates.iter().copied(), update_path_graph);
        info!(
            candidates = candidates.len(),
            hidden = hidden.len(),
            radius,
            "hid map objects in radius"
        );
        hidden
    }

    /// Unhide each object in `objects`
    pub fn unhide_map_objects<W, I>(&mut self, world: &mut W, objects: I, update_path_graph: bool) -> Vec<ObjectId>
    where
        W: World + ?Sized,
        I: IntoIterator<Item = ObjectId>,
    {
        objects
            .into_iter()
            .filter_map(|id| self.unhide_map_object(&mut *world, id, update_path_graph))
            .collect()
    }

    /// Unhide every hidden map object that was within `radius` of `center`.
    ///
    /// Hidden objects sit at their original position minus the hide offset,
    /// so the spatial query runs around the displaced center.
    pub fn unhide_map_objects_in_radius<W>(
        &mut self,
        world: &mut W,
        center: Vec3,
        radius: f64,
        limit_height: bool,
        update_path_graph: bool,
    ) -> Vec<ObjectId>
    where
        W: World + ?Sized,
    {
        let displaced = center - self.hide_offset();
        let candidates = candidates(&*world, displaced, radius, limit_height);
        let unhidden = self.unhide_map_objects(world, candidates.iter().copied(), update_path_graph);
        info!(
            candidates = candidates.len(),
            unhidden = unhidden.len(),
            radius,
            "unhid map objects in radius"
        );
        unhidden
    }

    /// Unhide every hidden object in the registry
    pub fn unhide_all_map_objects<W>(&mut self, world: &mut W, update_path_graph: bool) -> Vec<ObjectId>
    where
        W: World + ?Sized,
    {
        // Each unhide removes a link, so walk a snapshot
        let snapshot = self.registry.objects();
        let unhidden = self.unhide_map_objects(world, snapshot, update_path_graph);
        info!(unhidden = unhidden.len(), "unhid all map objects");
        unhidden
    }
}

fn candidates<W>(world: &W, center: Vec3, radius: f64, limit_height: bool) -> Vec<ObjectId>
where
    W: SpatialQuery + ?Sized,
{
    if limit_height {
        world.objects_at_position_3d(center, radius)
    } else {
        world.objects_at_position(center, radius)
    }
}
