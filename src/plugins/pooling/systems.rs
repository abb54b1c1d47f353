//! The request consumer.
//!
//! Exclusive: it needs the registry and the entities it manages at the same time, and it must
//! see the results of earlier requests in the same batch (a despawn right after a spawn).

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::pool::{PoolError, PoolRegistry, PooledUnit};

use super::host::{with_pools, WorldHost};
use super::messages::{PoolRequest, UnitSpawned};

pub fn apply_pool_requests(world: &mut World) {
    let requests: Vec<PoolRequest> = world.resource_mut::<Messages<PoolRequest>>().drain().collect();
    if requests.is_empty() {
        return;
    }

    let spawned = with_pools(world, |pools, host| {
        requests
            .into_iter()
            .filter_map(|request| match apply(pools, host, request) {
                Ok(unit) => unit,
                Err(err) => {
                    // A caller bug (missing pool) or a capacity decision; either way the
                    // request is dropped and the frame goes on.
                    error!("Dropped {request:?}: {err}");
                    None
                }
            })
            .collect::<Vec<_>>()
    });

    for unit in spawned {
        world.write_message(UnitSpawned { template: unit.template(), entity: unit.instance() });
    }
}

fn apply(
    pools: &mut PoolRegistry<Entity>,
    host: &mut WorldHost<'_>,
    request: PoolRequest,
) -> Result<Option<PooledUnit<Entity>>, PoolError> {
    match request {
        PoolRequest::Spawn { template, position, rotation, parent: None } => {
            pools.spawn(host, template, position, rotation).map(Some)
        }
        PoolRequest::Spawn { template, position, rotation, parent: Some(parent) } => {
            pools.spawn_with_parent(host, template, position, rotation, parent).map(Some)
        }
        PoolRequest::SpawnOldest { template } => pools.spawn_oldest(host, template),
        PoolRequest::Despawn { entity } => {
            pools.despawn(host, entity);
            Ok(None)
        }
        PoolRequest::DespawnOldest { template } => {
            pools.despawn_oldest(host, template);
            Ok(None)
        }
        PoolRequest::DespawnNewest { template } => {
            pools.despawn_newest(host, template);
            Ok(None)
        }
        PoolRequest::Collect { template } => pools.collect_pool(host, template).map(|_| None),
        PoolRequest::CollectAll => {
            let collected = pools.collect_all(host);
            debug!("Collected {collected} pooled units");
            Ok(None)
        }
        PoolRequest::ReleaseAll => {
            let destroyed = pools.release_all(host);
            debug!("Released all pools ({destroyed} units destroyed)");
            Ok(None)
        }
    }
}
