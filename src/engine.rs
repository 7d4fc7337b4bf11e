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

//! The MIDI dispatcher.
//!
//! Raw 3-byte messages from any adapter land here. The dispatcher is
//! channel-agnostic: it applies the global transpose, resolves samples
//! against the current store snapshot, and turns the result into
//! control events for the mixer. It never touches mixer state directly,
//! so it is safe to call from any non-realtime thread.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crossbeam_channel::TrySendError;
use midly::live::LiveEvent;
use midly::MidiMessage;
use tracing::{debug, info, warn};

use crate::mixer::{ControlEvent, EventSender};
use crate::samples::{PresetLoader, StoreHandle};

/// MIDI controller number of the sustain pedal.
const CC_SUSTAIN: u8 = 64;

/// Translates MIDI input into engine state changes.
pub struct Engine {
    events: EventSender,
    store: StoreHandle,
    transpose: Arc<AtomicI32>,
    loader: PresetLoader,
}

impl Engine {
    pub fn new(
        events: EventSender,
        store: StoreHandle,
        transpose: Arc<AtomicI32>,
        loader: PresetLoader,
    ) -> Engine {
        Engine {
            events,
            store,
            transpose,
            loader,
        }
    }

    /// Requests a preset load outside of MIDI (startup, buttons).
    pub fn load_preset(&self, preset: u8) {
        self.loader.request(preset);
    }

    /// Blocks until any in-flight preset load settles.
    #[cfg(test)]
    pub fn wait_for_loader(&self) {
        self.loader.wait_idle();
    }

    /// Handles one raw MIDI message from an adapter.
    pub fn handle_message(&self, raw: &[u8]) {
        let event = match LiveEvent::parse(raw) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Ignoring unparseable MIDI message");
                return;
            }
        };
        let LiveEvent::Midi { message, .. } = event else {
            return;
        };

        match message {
            MidiMessage::NoteOn { key, vel } if u8::from(vel) > 0 => {
                self.note_on(u8::from(key), u8::from(vel));
            }
            // Note-on at velocity zero is a note-off.
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                self.note_off(u8::from(key));
            }
            MidiMessage::Controller { controller, value }
                if u8::from(controller) == CC_SUSTAIN =>
            {
                self.sustain(u8::from(value) >= 64);
            }
            MidiMessage::ProgramChange { program } => {
                info!(preset = u8::from(program), "Program change");
                self.loader.request(u8::from(program));
            }
            _ => {}
        }
    }

    /// The incoming note after global transpose, when still in range.
    fn effective_note(&self, key: u8) -> Option<u8> {
        let note = key as i32 + self.transpose.load(Ordering::Relaxed);
        u8::try_from(note).ok().filter(|note| *note <= 127)
    }

    fn note_on(&self, key: u8, velocity: u8) {
        let Some(note) = self.effective_note(key) else {
            return;
        };
        // Velocity layers are sparse; a miss is a silent no-op.
        let Some(sample) = self.store.snapshot().get(note, velocity) else {
            debug!(note, velocity, "No sample mapped");
            return;
        };
        // Note-ons lose to a saturated queue; releases never do.
        if let Err(TrySendError::Full(_)) =
            self.events.try_send(ControlEvent::NoteOn { sample, note })
        {
            warn!(note, "Control queue saturated, dropping note-on");
        }
    }

    fn note_off(&self, key: u8) {
        let Some(note) = self.effective_note(key) else {
            return;
        };
        let _ = self.events.send(ControlEvent::NoteOff { note });
    }

    fn sustain(&self, on: bool) {
        let _ = self.events.send(ControlEvent::Sustain(on));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSink;
    use crate::mixer::control_channel;
    use crate::samples::{Sample, SampleStore};
    use crate::testutil;
    use crossbeam_channel::Receiver;
    use std::fs;

    fn engine_fixture(samples_dir: &std::path::Path) -> (Engine, Receiver<ControlEvent>, StoreHandle) {
        let store = StoreHandle::new();
        let (tx, rx) = control_channel();
        let transpose = Arc::new(AtomicI32::new(0));
        let loader = PresetLoader::new(
            samples_dir.to_path_buf(),
            store.clone(),
            tx.clone(),
            transpose.clone(),
            1.0,
            Arc::new(RecordingSink::new()),
        );
        (Engine::new(tx, store.clone(), transpose, loader), rx, store)
    }

    fn store_with(notes: &[(u8, u8)]) -> SampleStore {
        let mut store = SampleStore::default();
        for (note, velocity) in notes {
            store.insert(Sample::from_parts(
                vec![100i16; 64],
                None,
                *note,
                *velocity,
            ));
        }
        store
    }

    #[test]
    fn test_note_on_allocates_mapped_voice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, store) = engine_fixture(dir.path());
        store.install(store_with(&[(60, 127)]));

        engine.handle_message(&[0x90, 60, 127]);
        match rx.try_recv().expect("event") {
            ControlEvent::NoteOn { note, sample } => {
                assert_eq!(note, 60);
                assert_eq!(sample.midi_note(), 60);
            }
            _ => panic!("expected NoteOn"),
        }
    }

    #[test]
    fn test_unmapped_note_on_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, store) = engine_fixture(dir.path());
        store.install(store_with(&[(60, 127)]));

        // Wrong velocity layer and wrong note both miss.
        engine.handle_message(&[0x90, 60, 100]);
        engine.handle_message(&[0x90, 61, 127]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_note_off_and_velocity_zero_release() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, _) = engine_fixture(dir.path());

        engine.handle_message(&[0x80, 60, 0]);
        assert!(matches!(
            rx.try_recv().expect("event"),
            ControlEvent::NoteOff { note: 60 }
        ));

        engine.handle_message(&[0x90, 62, 0]);
        assert!(matches!(
            rx.try_recv().expect("event"),
            ControlEvent::NoteOff { note: 62 }
        ));
    }

    #[test]
    fn test_transpose_shifts_lookup_and_release() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, store) = engine_fixture(dir.path());
        store.install(store_with(&[(72, 127)]));
        engine.transpose.store(12, Ordering::Relaxed);

        engine.handle_message(&[0x90, 60, 127]);
        assert!(matches!(
            rx.try_recv().expect("event"),
            ControlEvent::NoteOn { note: 72, .. }
        ));

        engine.handle_message(&[0x80, 60, 0]);
        assert!(matches!(
            rx.try_recv().expect("event"),
            ControlEvent::NoteOff { note: 72 }
        ));

        // Transposed out of MIDI range: dropped entirely.
        engine.transpose.store(100, Ordering::Relaxed);
        engine.handle_message(&[0x90, 60, 127]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sustain_pedal_controller() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, _) = engine_fixture(dir.path());

        engine.handle_message(&[0xB0, 64, 127]);
        assert!(matches!(rx.try_recv().expect("event"), ControlEvent::Sustain(true)));

        engine.handle_message(&[0xB0, 64, 63]);
        assert!(matches!(rx.try_recv().expect("event"), ControlEvent::Sustain(false)));

        // Other controllers are ignored.
        engine.handle_message(&[0xB0, 1, 127]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_program_change_loads_preset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_dir = dir.path().join("3 Piano");
        fs::create_dir(&preset_dir).expect("mkdir");
        testutil::write_constant_wav(&preset_dir.join("60.wav"), 100, 1000, &[]);

        let (engine, _rx, store) = engine_fixture(dir.path());
        engine.handle_message(&[0xC0, 3]);
        engine.wait_for_loader();
        assert!(store.snapshot().get(60, 127).is_some());

        // The line adapter forwards program change with a zero-filled
        // third byte; the trailing byte is ignored.
        engine.handle_message(&[0xC0, 3, 0]);
        engine.wait_for_loader();
        assert!(store.snapshot().get(60, 127).is_some());
    }

    #[test]
    fn test_garbage_and_unhandled_messages_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (engine, rx, _) = engine_fixture(dir.path());

        engine.handle_message(&[]);
        engine.handle_message(&[0x42]);
        engine.handle_message(&[0xE0, 0, 64]); // pitch bend
        assert!(rx.try_recv().is_err());
    }
}
