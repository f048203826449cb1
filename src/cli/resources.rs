use std::future::Future;

use serde_json::Value;

use crate::{SpotifyError, utils};

async fn run<F>(message: &str, call: F)
where
    F: Future<Output = Result<Value, SpotifyError>>,
{
    let pb = utils::spinner(message);
    let result = call.await;
    pb.finish_and_clear();
    super::output(result);
}

pub async fn album(id: String, tracks: bool, limit: u32, save: bool, remove: bool, app: bool) {
    let client = super::client(app).await;
    if save {
        run("Saving album...", client.save_albums(&[id])).await;
    } else if remove {
        run("Removing album...", client.remove_saved_albums(&[id])).await;
    } else if tracks {
        run("Fetching album tracks...", client.album_tracks(&id, limit)).await;
    } else {
        run("Fetching album...", client.album(&id)).await;
    }
}

pub async fn artist(
    ids: Vec<String>,
    albums: bool,
    top_tracks: bool,
    related: bool,
    market: String,
    limit: u32,
    app: bool,
) {
    let client = super::client(app).await;
    let Some(id) = ids.first() else {
        return;
    };

    if ids.len() > 1 {
        run("Fetching artists...", client.several_artists(&ids)).await;
    } else if albums {
        run("Fetching artist albums...", client.artist_albums(id, limit)).await;
    } else if top_tracks {
        run(
            "Fetching artist top tracks...",
            client.artist_top_tracks(id, &market),
        )
        .await;
    } else if related {
        run("Fetching related artists...", client.related_artists(id)).await;
    } else {
        run("Fetching artist...", client.artist(id)).await;
    }
}

pub async fn track(ids: Vec<String>, audio_features: bool, app: bool) {
    let client = super::client(app).await;
    let Some(id) = ids.first() else {
        return;
    };

    match (audio_features, ids.len() > 1) {
        (true, true) => {
            run(
                "Fetching audio features...",
                client.several_audio_features(&ids),
            )
            .await
        }
        (true, false) => run("Fetching audio features...", client.audio_features(id)).await,
        (false, _) => run("Fetching track...", client.track(id)).await,
    }
}

pub async fn search(query: String, kind: String, limit: u32, offset: u32, app: bool) {
    let client = super::client(app).await;
    run(
        &format!("Searching {} for {:?}...", kind, query),
        client.search(&query, &kind, limit, offset),
    )
    .await;
}

/// `kind` is one of `featured`, `new-releases`, `categories`.
pub async fn browse(kind: &str, limit: u32, app: bool) {
    let client = super::client(app).await;
    match kind {
        "featured" => run("Fetching featured playlists...", client.featured_playlists(limit)).await,
        "new-releases" => run("Fetching new releases...", client.new_releases(limit)).await,
        _ => run("Fetching categories...", client.categories(limit)).await,
    }
}

pub async fn me(top: Option<String>, time_range: String, recent: bool, limit: u32) {
    let client = super::client(false).await;
    if let Some(kind) = top {
        run(
            &format!("Fetching top {}...", kind),
            client.top_items(&kind, &time_range, limit),
        )
        .await;
    } else if recent {
        run("Fetching recently played...", client.recently_played(limit)).await;
    } else {
        run("Fetching profile...", client.me()).await;
    }
}

pub async fn playlists(limit: u32, offset: u32) {
    let client = super::client(false).await;
    run("Fetching playlists...", client.my_playlists(limit, offset)).await;
}

pub async fn playlist_show(id: String, tracks: bool, limit: u32, offset: u32, app: bool) {
    let client = super::client(app).await;
    if tracks {
        run(
            "Fetching playlist tracks...",
            client.playlist_tracks(&id, limit, offset),
        )
        .await;
    } else {
        run("Fetching playlist...", client.playlist(&id)).await;
    }
}

pub async fn playlist_create(name: String, description: String, public: bool) {
    let client = super::client(false).await;
    run(
        "Creating playlist...",
        client.create_playlist(&name, &description, public),
    )
    .await;
}

pub async fn playlist_add_tracks(id: String, uris: Vec<String>) {
    let client = super::client(false).await;
    run(
        "Adding tracks to playlist...",
        client.add_tracks_to_playlist(&id, &uris),
    )
    .await;
}

pub async fn library_saved(limit: u32, offset: u32) {
    let client = super::client(false).await;
    run("Fetching saved tracks...", client.saved_tracks(limit, offset)).await;
}

pub async fn library_save(ids: Vec<String>) {
    let client = super::client(false).await;
    run("Saving tracks...", client.save_tracks(&ids)).await;
}

pub async fn library_remove(ids: Vec<String>) {
    let client = super::client(false).await;
    run("Removing tracks...", client.remove_saved_tracks(&ids)).await;
}

pub async fn library_contains(ids: Vec<String>) {
    let client = super::client(false).await;
    run("Checking saved tracks...", client.check_saved_tracks(&ids)).await;
}
