// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Asynchronous, pre-emptible preset loading.
//!
//! A preset is a directory under the samples root whose name starts with
//! the preset number and a space. With a `definition.txt` the files are
//! mapped through pattern rules; without one, `<note>.wav` files map
//! directly. Every load first wipes the store, the voices, and the
//! globals, so a missing preset leaves the engine silent and empty. The
//! load runs on its own thread, checks for pre-emption between files,
//! and on success atomically installs the new store and applies the
//! preset's global volume and transpose.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use regex::Regex;
use tracing::{debug, info, warn};

use super::store::{Sample, SampleStore, StoreHandle};
use crate::display::{self, StatusSink};
use crate::mixer::{ControlEvent, EventSender};
use crate::playsync::Interrupt;

/// Note names in semitone order, as they appear in file names.
const NOTES: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// Errors in a single definition line. The line is logged and skipped;
/// the rest of the preset still loads.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Invalid pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error("Malformed global parameter")]
    BadGlobal,
    #[error("Malformed rule parameter: {0}")]
    BadParameter(String),
}

/// Everything a load needs, shared with the loader thread.
struct Shared {
    samples_dir: PathBuf,
    store: StoreHandle,
    events: EventSender,
    transpose: Arc<AtomicI32>,
    default_volume: f32,
    display: Arc<dyn StatusSink>,
}

struct State {
    interrupt: Option<Interrupt>,
    thread: Option<JoinHandle<()>>,
}

/// Runs preset loads in the background, one at a time.
///
/// A new request interrupts and joins the running load before starting,
/// so requests coalesce: only the most recent one publishes a store.
pub struct PresetLoader {
    shared: Arc<Shared>,
    state: Mutex<State>,
}

impl PresetLoader {
    pub fn new(
        samples_dir: PathBuf,
        store: StoreHandle,
        events: EventSender,
        transpose: Arc<AtomicI32>,
        default_volume: f32,
        display: Arc<dyn StatusSink>,
    ) -> PresetLoader {
        PresetLoader {
            shared: Arc::new(Shared {
                samples_dir,
                store,
                events,
                transpose,
                default_volume,
                display,
            }),
            state: Mutex::new(State {
                interrupt: None,
                thread: None,
            }),
        }
    }

    /// Requests a load of `preset`, pre-empting any load in progress.
    /// The wait is bounded by a single file decode.
    pub fn request(&self, preset: u8) {
        let mut state = self.state.lock();
        if let Some(interrupt) = state.interrupt.take() {
            interrupt.interrupt();
        }
        if let Some(thread) = state.thread.take() {
            let _ = thread.join();
        }

        let interrupt = Interrupt::new();
        state.interrupt = Some(interrupt.clone());
        let shared = self.shared.clone();
        state.thread = Some(
            thread::Builder::new()
                .name("preset-loader".to_string())
                .spawn(move || load_preset(&shared, preset, &interrupt))
                .expect("Unable to spawn loader thread"),
        );
    }

    /// Blocks until the in-flight load (if any) finishes.
    pub fn wait_idle(&self) {
        let mut state = self.state.lock();
        state.interrupt.take();
        if let Some(thread) = state.thread.take() {
            let _ = thread.join();
        }
    }
}

fn load_preset(shared: &Shared, preset: u8, interrupt: &Interrupt) {
    // Every load starts from silence: wipe the store and reset the
    // globals before even looking for the directory, so a missing
    // preset leaves the engine empty rather than playing stale samples.
    shared.store.install(SampleStore::default());
    shared.transpose.store(0, Ordering::Relaxed);
    let _ = shared.events.send(ControlEvent::ClearVoices);
    let _ = shared.events.send(ControlEvent::SetVolume(shared.default_volume));

    let Some(dir) = find_preset_dir(&shared.samples_dir, preset) else {
        warn!(preset, "No directory for preset");
        shared.display.show(&display::empty(preset));
        return;
    };

    info!(preset, dir = ?dir, "Loading preset");
    shared.display.show(&display::loading(preset));

    let mut volume = shared.default_volume;
    let mut transpose = 0i32;
    let mut store = SampleStore::default();

    let definition = dir.join("definition.txt");
    let completed = if definition.is_file() {
        load_with_definition(
            &dir,
            &definition,
            &mut store,
            &mut volume,
            &mut transpose,
            interrupt,
        )
    } else {
        load_numbered(&dir, &mut store, interrupt)
    };
    if !completed {
        debug!(preset, "Preset load pre-empted");
        return;
    }

    let count = store.len();
    shared.store.install(store);
    shared.transpose.store(transpose, Ordering::Relaxed);
    // Clear first so the new volume never applies to old voices.
    let _ = shared.events.send(ControlEvent::ClearVoices);
    let _ = shared.events.send(ControlEvent::SetVolume(volume));

    if count == 0 {
        info!(preset, "Preset empty");
        shared.display.show(&display::empty(preset));
    } else {
        info!(preset, samples = count, "Preset loaded");
        shared.display.show(&display::loaded(preset));
    }
}

/// Finds the directory whose name starts with `"<preset> "`.
fn find_preset_dir(samples_dir: &Path, preset: u8) -> Option<PathBuf> {
    let prefix = format!("{} ", preset);
    let entries = match fs::read_dir(samples_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = ?samples_dir, error = %e, "Unable to read samples directory");
            return None;
        }
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        if entry.path().is_dir() && name.to_string_lossy().starts_with(&prefix) {
            return Some(entry.path());
        }
    }
    None
}

/// File names in the preset directory, sorted for a stable load order.
fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(e) => {
            warn!(dir = ?dir, error = %e, "Unable to read preset directory");
            Vec::new()
        }
    };
    names.sort();
    names
}

fn load_with_definition(
    dir: &Path,
    definition: &Path,
    store: &mut SampleStore,
    volume: &mut f32,
    transpose: &mut i32,
    interrupt: &Interrupt,
) -> bool {
    let contents = match fs::read_to_string(definition) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = ?definition, error = %e, "Unable to read definition file");
            return true;
        }
    };

    let files = list_files(dir);
    for (index, line) in contents.lines().enumerate() {
        match parse_definition_line(line) {
            Ok(None) => {}
            Ok(Some(DefinitionLine::Volume(db))) => {
                *volume *= 10f32.powf(db / 20.0);
            }
            Ok(Some(DefinitionLine::Transpose(semitones))) => {
                *transpose = semitones;
            }
            Ok(Some(DefinitionLine::Rule(rule))) => {
                for file_name in &files {
                    if interrupt.is_interrupted() {
                        return false;
                    }
                    let Some((midi_note, velocity)) = rule.resolve(file_name) else {
                        continue;
                    };
                    match Sample::load(&dir.join(file_name), midi_note, velocity) {
                        Ok(sample) => store.insert(sample),
                        Err(e) => {
                            warn!(file = %file_name, error = %e, "Skipping unreadable sample")
                        }
                    }
                }
            }
            Err(e) => warn!(line = index + 1, error = %e, "Skipping definition line"),
        }
    }
    true
}

/// Without a definition file, `<note>.wav` maps to (note, 127).
fn load_numbered(dir: &Path, store: &mut SampleStore, interrupt: &Interrupt) -> bool {
    for midi_note in 0..127u8 {
        if interrupt.is_interrupted() {
            return false;
        }
        let path = dir.join(format!("{}.wav", midi_note));
        if !path.is_file() {
            continue;
        }
        match Sample::load(&path, midi_note, 127) {
            Ok(sample) => store.insert(sample),
            Err(e) => warn!(path = ?path, error = %e, "Skipping unreadable sample"),
        }
    }
    true
}

/// One parsed line of `definition.txt`.
pub(crate) enum DefinitionLine {
    /// A filename pattern with per-rule defaults.
    Rule(MappingRule),
    /// `%%volume=<db>`: multiply the preset volume by `10^(db/20)`.
    Volume(f32),
    /// `%%transpose=<n>`: set the global transpose in semitones.
    Transpose(i32),
}

/// A compiled mapping rule: the pattern's named captures supply the
/// note and velocity, with the per-rule defaults as fallback.
pub(crate) struct MappingRule {
    pattern: Regex,
    default_midinote: u8,
    default_velocity: u8,
    default_notename: String,
}

impl MappingRule {
    /// Applies the rule to a file name, yielding its (note, velocity).
    pub(crate) fn resolve(&self, file_name: &str) -> Option<(u8, u8)> {
        let captures = self.pattern.captures(file_name)?;

        let notename = captures
            .name("notename")
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.default_notename.clone());
        let midi_note = if notename.is_empty() {
            captures
                .name("midinote")
                .map(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(Some(self.default_midinote as u32))?
        } else {
            note_name_to_midi(&notename)? as u32
        };
        let velocity = captures
            .name("velocity")
            .map(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(Some(self.default_velocity as u32))?;

        if midi_note > 127 || velocity > 127 {
            return None;
        }
        Some((midi_note as u8, velocity as u8))
    }
}

/// Parses one definition line. Blank lines yield `None`; malformed
/// lines are errors the caller logs and skips.
pub(crate) fn parse_definition_line(
    line: &str,
) -> Result<Option<DefinitionLine>, DefinitionError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // %%-lines set preset-wide parameters.
    if trimmed.contains("%%volume") {
        let value = global_value(trimmed)?.parse::<f32>().map_err(|_| DefinitionError::BadGlobal)?;
        return Ok(Some(DefinitionLine::Volume(value)));
    }
    if trimmed.contains("%%transpose") {
        let value = global_value(trimmed)?.parse::<i32>().map_err(|_| DefinitionError::BadGlobal)?;
        return Ok(Some(DefinitionLine::Transpose(value)));
    }

    let (pattern_part, params_part) = match trimmed.split_once(',') {
        Some((pattern, params)) => (pattern, Some(params)),
        None => (trimmed, None),
    };

    let mut default_midinote: u8 = 0;
    let mut default_velocity: u8 = 127;
    let mut default_notename = String::new();

    if let Some(params) = params_part {
        for item in params.replace(' ', "").replace('%', "").split(',') {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| DefinitionError::BadParameter(item.to_string()))?;
            match key {
                "midinote" => {
                    default_midinote = value
                        .parse()
                        .map_err(|_| DefinitionError::BadParameter(item.to_string()))?
                }
                "velocity" => {
                    default_velocity = value
                        .parse()
                        .map_err(|_| DefinitionError::BadParameter(item.to_string()))?
                }
                "notename" => default_notename = value.to_lowercase(),
                // Unknown keys are tolerated.
                _ => {}
            }
        }
    }

    let pattern = compile_pattern(pattern_part.trim())?;
    Ok(Some(DefinitionLine::Rule(MappingRule {
        pattern,
        default_midinote,
        default_velocity,
        default_notename,
    })))
}

/// Expands the pattern tokens into named capture groups. Everything
/// else matches literally; `*` is a non-greedy wildcard. Matching is
/// anchored at the start of the file name only.
fn compile_pattern(pattern: &str) -> Result<Regex, DefinitionError> {
    let expanded = regex::escape(pattern)
        .replace("%midinote", r"(?P<midinote>\d+)")
        .replace("%velocity", r"(?P<velocity>\d+)")
        .replace("%notename", r"(?P<notename>[A-Ga-g]#?[0-9])")
        .replace(r"\*", ".*?");
    Ok(Regex::new(&format!("^{}", expanded))?)
}

/// The value after `=` in a `%%` parameter line.
fn global_value(line: &str) -> Result<&str, DefinitionError> {
    line.split_once('=')
        .map(|(_, value)| value.trim())
        .ok_or(DefinitionError::BadGlobal)
}

/// Derives a MIDI note from a name like `a#3`: the semitone index plus
/// `(octave + 2) * 12`.
fn note_name_to_midi(name: &str) -> Option<u8> {
    let octave = name.chars().last()?.to_digit(10)? as i32;
    let stem = name[..name.len() - 1].to_lowercase();
    let index = NOTES.iter().position(|n| *n == stem)? as i32;
    u8::try_from(index + (octave + 2) * 12).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSink;
    use crate::mixer::control_channel;
    use crate::testutil;
    use crossbeam_channel::Receiver;

    fn loader_fixture(
        samples_dir: &Path,
    ) -> (
        PresetLoader,
        StoreHandle,
        Receiver<ControlEvent>,
        Arc<AtomicI32>,
        Arc<RecordingSink>,
    ) {
        let store = StoreHandle::new();
        let (tx, rx) = control_channel();
        let transpose = Arc::new(AtomicI32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let loader = PresetLoader::new(
            samples_dir.to_path_buf(),
            store.clone(),
            tx,
            transpose.clone(),
            0.25,
            sink.clone(),
        );
        (loader, store, rx, transpose, sink)
    }

    #[test]
    fn test_numbered_preset_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("3 Piano");
        fs::create_dir(&preset_dir).expect("mkdir");
        testutil::write_constant_wav(&preset_dir.join("60.wav"), 100, 1000, &[]);
        testutil::write_constant_wav(&preset_dir.join("61.wav"), 100, 1000, &[]);
        // Files that are not numbered notes are ignored.
        fs::write(preset_dir.join("README"), "not audio").expect("write");

        let (loader, store, rx, _, sink) = loader_fixture(dir.path());
        loader.request(3);
        loader.wait_idle();

        let snapshot = store.snapshot();
        assert!(snapshot.get(60, 127).is_some());
        assert!(snapshot.get(61, 127).is_some());
        assert!(snapshot.get(62, 127).is_none());
        assert_eq!(sink.shown(), vec!["L003".to_string(), "0003".to_string()]);

        // The initial wipe and the publication each clear the mixer and
        // then apply a volume.
        let events: Vec<ControlEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ControlEvent::ClearVoices));
        assert!(matches!(events[2], ControlEvent::ClearVoices));
        match events[3] {
            ControlEvent::SetVolume(volume) => assert!((volume - 0.25).abs() < 1e-6),
            _ => panic!("expected SetVolume"),
        }
    }

    #[test]
    fn test_definition_preset_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("5 Strings");
        fs::create_dir(&preset_dir).expect("mkdir");
        fs::write(
            preset_dir.join("definition.txt"),
            "%%volume=-6\n%%transpose=2\nPiano-%notename-v%velocity.wav\n",
        )
        .expect("write definition");
        testutil::write_constant_wav(&preset_dir.join("Piano-a#3-v96.wav"), 100, 1000, &[]);
        testutil::write_constant_wav(&preset_dir.join("Piano-c4-v127.wav"), 100, 1000, &[]);

        let (loader, store, rx, transpose, _) = loader_fixture(dir.path());
        loader.request(5);
        loader.wait_idle();

        let snapshot = store.snapshot();
        // a#3 -> 10 + (3+2)*12 = 70, c4 -> 0 + (4+2)*12 = 72.
        assert!(snapshot.get(70, 96).is_some());
        assert!(snapshot.get(72, 127).is_some());
        assert_eq!(transpose.load(Ordering::Relaxed), 2);

        // The last SetVolume carries the definition-scaled volume.
        let events: Vec<ControlEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        match events[3] {
            ControlEvent::SetVolume(volume) => {
                let expected = 0.25 * 10f32.powf(-6.0 / 20.0);
                assert!((volume - expected).abs() < 1e-6);
            }
            _ => panic!("expected SetVolume"),
        }
    }

    #[test]
    fn test_missing_preset_clears_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("3 Piano");
        fs::create_dir(&preset_dir).expect("mkdir");
        testutil::write_constant_wav(&preset_dir.join("60.wav"), 100, 1000, &[]);

        let (loader, store, rx, transpose, sink) = loader_fixture(dir.path());
        loader.request(3);
        loader.wait_idle();
        assert!(store.snapshot().get(60, 127).is_some());
        transpose.store(5, Ordering::Relaxed);

        loader.request(9);
        loader.wait_idle();
        // The wipe runs before directory discovery, so even a missing
        // preset silences the engine and resets the globals.
        assert!(store.snapshot().is_empty());
        assert_eq!(transpose.load(Ordering::Relaxed), 0);
        assert!(sink.shown().contains(&"E009".to_string()));
        // Preset 3's wipe-and-publish pairs plus preset 9's wipe pair.
        let events: Vec<ControlEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[4], ControlEvent::ClearVoices));
        match events[5] {
            ControlEvent::SetVolume(volume) => assert!((volume - 0.25).abs() < 1e-6),
            _ => panic!("expected SetVolume"),
        }
    }

    #[test]
    fn test_empty_preset_directory_installs_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("7 Nothing")).expect("mkdir");

        let (loader, store, _rx, _, sink) = loader_fixture(dir.path());
        loader.request(7);
        loader.wait_idle();

        assert!(store.snapshot().is_empty());
        assert_eq!(sink.shown(), vec!["L007".to_string(), "E007".to_string()]);
    }

    #[test]
    fn test_requests_coalesce_to_newest() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (preset, note) in [(3u8, 60u8), (7, 72)] {
            let preset_dir = dir.path().join(format!("{} Bank", preset));
            fs::create_dir(&preset_dir).expect("mkdir");
            testutil::write_constant_wav(&preset_dir.join(format!("{}.wav", note)), 100, 1000, &[]);
        }

        let (loader, store, _rx, _, _) = loader_fixture(dir.path());
        loader.request(3);
        loader.request(7);
        loader.wait_idle();

        // Preset 7 was requested last, so its store is resident.
        let snapshot = store.snapshot();
        assert!(snapshot.get(72, 127).is_some());
        assert!(snapshot.get(60, 127).is_none());
    }

    #[test]
    fn test_interrupted_load_publishes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("3 Piano");
        fs::create_dir(&preset_dir).expect("mkdir");
        testutil::write_constant_wav(&preset_dir.join("60.wav"), 100, 1000, &[]);

        let (loader, store, _rx, _, sink) = loader_fixture(dir.path());
        let interrupt = Interrupt::new();
        interrupt.interrupt();
        load_preset(&loader.shared, 3, &interrupt);

        // The up-front wipe ran, but no preset content was published.
        assert!(store.snapshot().is_empty());
        assert!(!sink.shown().contains(&"0003".to_string()));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("2 Mixed");
        fs::create_dir(&preset_dir).expect("mkdir");
        fs::write(
            preset_dir.join("definition.txt"),
            "%%volume=sideways\n%midinote.wav, velocity=banana\n%midinote.wav\n",
        )
        .expect("write definition");
        testutil::write_constant_wav(&preset_dir.join("64.wav"), 100, 1000, &[]);

        let (loader, store, _rx, _, _) = loader_fixture(dir.path());
        loader.request(2);
        loader.wait_idle();

        // Only the final well-formed rule contributed.
        let snapshot = store.snapshot();
        assert!(snapshot.get(64, 127).is_some());
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_unreadable_sample_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("4 Broken");
        fs::create_dir(&preset_dir).expect("mkdir");
        testutil::write_constant_wav(&preset_dir.join("60.wav"), 100, 1000, &[]);
        fs::write(preset_dir.join("61.wav"), b"junk that is not a wave").expect("write");

        let (loader, store, _rx, _, sink) = loader_fixture(dir.path());
        loader.request(4);
        loader.wait_idle();

        let snapshot = store.snapshot();
        assert!(snapshot.get(60, 127).is_some());
        assert!(snapshot.get(61, 127).is_none());
        assert_eq!(sink.shown(), vec!["L004".to_string(), "0004".to_string()]);
    }

    #[test]
    fn test_parse_rule_with_defaults() {
        let line = "Drum-*.wav, midinote=36, velocity=100";
        let Ok(Some(DefinitionLine::Rule(rule))) = parse_definition_line(line) else {
            panic!("expected a rule");
        };
        assert_eq!(rule.resolve("Drum-kick.wav"), Some((36, 100)));
        assert_eq!(rule.resolve("Cymbal-ride.wav"), None);
    }

    #[test]
    fn test_parse_rule_tokens_round_trip() {
        let line = "Piano-%notename-v%velocity.wav";
        let Ok(Some(DefinitionLine::Rule(rule))) = parse_definition_line(line) else {
            panic!("expected a rule");
        };
        assert_eq!(rule.resolve("Piano-a#3-v96.wav"), Some((70, 96)));
        assert_eq!(rule.resolve("Piano-g9-v127.wav"), None); // note 127+ rejected

        let line = "%midinote-%velocity.wav";
        let Ok(Some(DefinitionLine::Rule(rule))) = parse_definition_line(line) else {
            panic!("expected a rule");
        };
        assert_eq!(rule.resolve("60-127.wav"), Some((60, 127)));
    }

    #[test]
    fn test_parse_rule_notename_default() {
        let line = "pad.wav, notename=c3";
        let Ok(Some(DefinitionLine::Rule(rule))) = parse_definition_line(line) else {
            panic!("expected a rule");
        };
        // c3 -> 0 + (3+2)*12 = 60.
        assert_eq!(rule.resolve("pad.wav"), Some((60, 127)));
    }

    #[test]
    fn test_parse_globals() {
        match parse_definition_line("%%volume=-12") {
            Ok(Some(DefinitionLine::Volume(db))) => assert_eq!(db, -12.0),
            _ => panic!("expected volume"),
        }
        match parse_definition_line("%%transpose=-3") {
            Ok(Some(DefinitionLine::Transpose(n))) => assert_eq!(n, -3),
            _ => panic!("expected transpose"),
        }
        assert!(parse_definition_line("%%volume").is_err());
        assert!(parse_definition_line("").expect("blank ok").is_none());
    }

    #[test]
    fn test_note_name_derivation() {
        assert_eq!(note_name_to_midi("a#3"), Some(70));
        assert_eq!(note_name_to_midi("c0"), Some(24));
        // Above the MIDI range; the mapping rule rejects it later.
        assert_eq!(note_name_to_midi("b8"), Some(131));
        assert_eq!(note_name_to_midi("x4"), None);
        assert_eq!(note_name_to_midi(""), None);
    }
}
