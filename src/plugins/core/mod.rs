//! Core plugin: tunables and global settings.

use bevy::prelude::*;

use crate::common::tunables::{DEFAULT_PATH, Tunables};

/// Insert `Tunables` from disk unless the app already has some (tests insert their own).
pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        let (tunables, err) = Tunables::load_or_default(DEFAULT_PATH);
        match err {
            Some(e) => warn!("using default tunables: {e}"),
            None => info!("tunables loaded from {DEFAULT_PATH}"),
        }
        app.insert_resource(tunables);
    }
    for w in app.world().resource::<Tunables>().validate() {
        warn!("tunables: {w}");
    }

    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
