use super::*;
use crate::common::tunables::TrackTunables;

#[test]
fn mirror_formats_counters() {
    let mut character = CharacterState::new(3);
    character.current_life = 2;
    character.coins = 14;

    let mut track = TrackManager::new(TrackTunables {
        countdown: 2.25,
        ..TrackTunables::default()
    });
    track.begin();

    let mut hud = Hud::default();
    hud.mirror(&character, &track);

    assert_eq!(hud.coins, "14");
    assert_eq!(hud.life_hearts, vec![true, true, false]);
    assert_eq!(hud.multiplier, "x 1");
    assert_eq!(hud.distance, "0m");
    assert_eq!(hud.zone, "zone 1");
    let c = hud.countdown.as_ref().expect("countdown visible");
    assert_eq!(c.text, "3");
    assert!((c.scale - 0.75).abs() < 1e-5);
}

#[test]
fn countdown_hidden_once_started() {
    let mut track = TrackManager::new(TrackTunables::default());
    track.begin();
    track.advance(10.0);

    let mut hud = Hud::default();
    hud.mirror(&CharacterState::new(3), &track);
    assert!(hud.countdown.is_none());
}

#[test]
fn hints_are_keyed_by_stage() {
    let mut hud = Hud::default();
    hud.set_hint(TutorialStage::DownSlide, true);
    assert!(hud.hint(TutorialStage::DownSlide));
    assert!(!hud.hint(TutorialStage::SideSlide));
    assert_eq!(hud.visible_hint(), Some(TutorialStage::DownSlide));

    hud.reset_overlays(true);
    assert_eq!(hud.visible_hint(), None);
    assert!(hud.canvas_visible && hud.whole_ui_visible && hud.pause_button_visible);
}

#[test]
fn lines_follow_visibility() {
    let mut hud = Hud::default();
    assert!(hud.lines().is_empty());

    hud.reset_overlays(false);
    hud.pause_menu_visible = true;
    hud.whole_ui_visible = false;
    let lines = hud.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("PAUSED"));
}

#[test]
fn zone_follows_track() {
    let mut track = TrackManager::new(TrackTunables::default());
    track.begin();
    track.change_zone();

    let mut hud = Hud::default();
    hud.mirror(&CharacterState::new(3), &track);
    assert_eq!(hud.zone, "zone 2");
}

#[test]
fn popup_lists_every_continuation() {
    let mut hud = Hud::default();
    hud.reset_overlays(true);
    hud.whole_ui_visible = false;
    hud.game_over_popup_visible = true;
    hud.premium_owned = "1".into();

    let lines = hud.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("not enough premium"));
    assert!(lines[0].contains("[V]"));
    assert!(lines[0].contains("[N]"));
}
