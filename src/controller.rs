//! MIDI keyboard controller: wires a [`DeviceWatcher`] and a [`NoteMapper`]
//! to a device hub.

use monokey_midi::{
    DeviceChange, DeviceChangeListener, DeviceHub, SharedNoteListener, Subscription,
};
use monokey_synth::Oscillator;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::builder::MidiControllerBuilder;
use crate::config::{ControllerConfig, NoteRange};
use crate::mapper::NoteMapper;
use crate::watcher::DeviceWatcher;

/// Drives one oscillator from every connected MIDI keyboard.
///
/// The controller is inert until [`start`](Self::start). Its hub subscription
/// and all per-device note handlers are released by [`stop`](Self::stop) or on
/// drop, so controllers can be torn down and recreated against the same hub.
///
/// # Example
///
/// ```ignore
/// let osc = SharedOscillator::default();
/// let mut controller = MidiController::builder()
///     .range(20, 80)
///     .oscillator(osc.clone())
///     .build()?;
///
/// controller.start(&hub);
/// hub.update();
/// ```
pub struct MidiController<O: Oscillator + Send + 'static> {
    mapper: Arc<Mutex<NoteMapper<O>>>,
    watcher: Arc<Mutex<DeviceWatcher>>,
    subscription: Option<Subscription>,
}

impl<O: Oscillator + Send + 'static> MidiController<O> {
    pub fn builder() -> MidiControllerBuilder<O> {
        MidiControllerBuilder::default()
    }

    /// Unlike the builder, accepts an empty range and only warns about it.
    pub fn new(config: ControllerConfig, oscillator: O) -> Self {
        if let Err(e) = config.validate() {
            warn!("{}", e);
        }

        let mapper = Arc::new(Mutex::new(NoteMapper::new(config.range, oscillator)));
        let listener: SharedNoteListener = mapper.clone();
        let watcher = Arc::new(Mutex::new(DeviceWatcher::new(listener)));

        Self {
            mapper,
            watcher,
            subscription: None,
        }
    }

    /// Subscribe to device changes on `hub` and attach to the MIDI devices it
    /// already has. Calling `start` again while running does nothing.
    pub fn start(&mut self, hub: &DeviceHub) {
        if self.subscription.is_some() {
            debug!("MIDI controller already running");
            return;
        }

        {
            let mut watcher = self.watcher.lock();
            for device in hub.devices() {
                watcher.on_device_change(device, DeviceChange::Added);
            }
        }
        self.subscription = Some(hub.on_device_change(self.watcher.clone()));
        debug!(range = ?self.mapper.lock().range(), "MIDI controller started");
    }

    /// Unsubscribe from the hub and detach from every device.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            self.watcher.lock().detach_all();
            debug!("MIDI controller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn attached_devices(&self) -> usize {
        self.watcher.lock().attached_devices()
    }

    /// Note currently assigned to the oscillator, if any.
    pub fn current_note(&self) -> Option<i32> {
        self.mapper.lock().current_note()
    }

    pub fn range(&self) -> NoteRange {
        self.mapper.lock().range()
    }

    /// Locks the mapper. Device dispatch locks the same mutex, so drop the
    /// guard before calling `DeviceHub::update` or `DeviceHub::send_midi`,
    /// otherwise the dispatching thread deadlocks.
    pub fn mapper(&self) -> MutexGuard<'_, NoteMapper<O>> {
        self.mapper.lock()
    }

    /// Handle to the mapper as a note listener, for manual registration.
    pub fn note_listener(&self) -> SharedNoteListener {
        self.mapper.clone()
    }
}

impl<O: Oscillator + Send + 'static> Drop for MidiController<O> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monokey_midi::{DeviceDescription, DeviceKind, InputDevice};
    use monokey_synth::SharedOscillator;

    fn controller(low: i32, high: i32) -> (MidiController<SharedOscillator>, SharedOscillator) {
        let osc = SharedOscillator::default();
        let controller = MidiController::new(ControllerConfig::with_range(low, high), osc.clone());
        (controller, osc)
    }

    #[test]
    fn test_inert_until_started() {
        let mut hub = DeviceHub::new();
        let (controller, osc) = controller(20, 80);
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        hub.send_midi(id, &[0x90, 69, 100]);

        assert!(!controller.is_running());
        assert!(!osc.is_playing());
    }

    #[test]
    fn test_start_attaches_existing_devices() {
        let mut hub = DeviceHub::new();
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        let (mut controller, osc) = controller(20, 80);
        controller.start(&hub);

        assert_eq!(controller.attached_devices(), 1);
        hub.send_midi(id, &[0x90, 69, 100]);
        assert!(osc.is_playing());
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut hub = DeviceHub::new();
        let (mut controller, _osc) = controller(20, 80);
        controller.start(&hub);
        controller.start(&hub);
        assert_eq!(hub.device_change_listeners(), 1);

        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        let midi = hub.device(id).and_then(InputDevice::as_midi).unwrap();
        assert_eq!(midi.note_on_listeners(), 1);
    }

    #[test]
    fn test_stop_releases_everything() {
        let mut hub = DeviceHub::new();
        let (mut controller, osc) = controller(20, 80);
        controller.start(&hub);
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);

        controller.stop();
        assert!(!controller.is_running());
        assert_eq!(hub.device_change_listeners(), 0);
        assert_eq!(controller.attached_devices(), 0);

        hub.send_midi(id, &[0x90, 69, 100]);
        assert!(!osc.is_playing());
    }

    #[test]
    fn test_drop_releases_hub_subscription() {
        let mut hub = DeviceHub::new();
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        {
            let (mut controller, _osc) = controller(20, 80);
            controller.start(&hub);
            assert_eq!(hub.device_change_listeners(), 1);
        }
        assert_eq!(hub.device_change_listeners(), 0);
        let midi = hub.device(id).and_then(InputDevice::as_midi).unwrap();
        assert_eq!(midi.note_on_listeners(), 0);
        assert_eq!(midi.note_off_listeners(), 0);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut hub = DeviceHub::new();
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        let (mut controller, osc) = controller(20, 80);
        controller.start(&hub);
        controller.stop();
        controller.start(&hub);

        hub.send_midi(id, &[0x90, 60, 100]);
        assert!(osc.is_playing());
        assert_eq!(controller.current_note(), Some(60));
    }

    #[test]
    fn test_state_accessors_release_the_mapper_lock() {
        let mut hub = DeviceHub::new();
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        let (mut controller, osc) = controller(20, 80);
        controller.start(&hub);

        assert_eq!(controller.range(), NoteRange::new(20, 80));
        assert_eq!(controller.current_note(), None);
        // Dispatch after reading state must not block on the mapper.
        hub.send_midi(id, &[0x90, 64, 100]);
        assert_eq!(controller.current_note(), Some(64));
        hub.send_midi(id, &[0x80, 64, 0]);
        assert!(!osc.is_playing());
        assert_eq!(controller.current_note(), Some(64));
    }

    #[test]
    fn test_empty_range_is_accepted_with_warning() {
        let mut hub = DeviceHub::new();
        let (mut controller, osc) = controller(60, 60);
        controller.start(&hub);
        let id = hub.add_device(DeviceDescription::midi("Keys"), DeviceKind::Midi);
        hub.send_midi(id, &[0x90, 60, 100]);
        assert!(!osc.is_playing());
    }
}
