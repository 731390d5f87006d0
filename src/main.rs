use rhythm_weaver::sequencer::{LookAheadScheduler, PatternStore, Pulse, VisualSink, start_tick_loop};
use rhythm_weaver::{AudioEngine, SessionStore, ToneOutput, create_click_channel};
use std::io::BufRead;
use std::sync::{Arc, Mutex};

// Ringbuffer capacity constant
// Sized well beyond the worst case: at 300 BPM with 16 subdivisions a tick
// queues about 9 clicks, and the audio callback drains the queue every
// buffer period (typically 5-20ms)
const CLICK_RINGBUFFER_CAPACITY: usize = 256;

/// Terminal front-end for pulse highlights
///
/// Prints as soon as the pulse is queued. The delay tells a richer front-end
/// how long to wait before flashing; a terminal line a few dozen
/// milliseconds early is close enough.
struct TerminalVisuals;

impl VisualSink for TerminalVisuals {
    fn on_pulse_due(&mut self, measure: usize, pulse: usize, _delay_ms: f64) {
        println!("  > measure {} pulse {}", measure + 1, pulse + 1);
    }
}

fn main() {
    println!("=== Rhythm Weaver ===");
    println!("Version 0.1.0\n");

    let (click_tx, click_rx) = create_click_channel(CLICK_RINGBUFFER_CAPACITY);

    println!("Audio engine initialisation...");
    let audio_engine = match AudioEngine::new(click_rx) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };
    println!("Output stream running at {} Hz", audio_engine.sample_rate());

    // Auto-save is best-effort: a missing data dir disables it but the
    // sequencer still works
    let session = match SessionStore::at_default_location() {
        Ok(session) => {
            println!("Session file: {}", session.path().display());
            Some(session)
        }
        Err(e) => {
            eprintln!("WARNING: auto-save disabled: {}", e);
            None
        }
    };

    let store = session
        .as_ref()
        .map(|s| s.load_or_default())
        .unwrap_or_default();
    println!(
        "Loaded {} measure(s) at {} BPM\n",
        store.len(),
        store.tempo()
    );

    let store = Arc::new(Mutex::new(store));
    let scheduler = Arc::new(Mutex::new(LookAheadScheduler::new()));

    // The tick thread pumps the scheduler against the audio clock
    let clock = audio_engine.timing();
    let mut tones = ToneOutput::new(click_tx, audio_engine.timing());
    let mut visuals = TerminalVisuals;
    let tick_store = Arc::clone(&store);
    let tick_scheduler = Arc::clone(&scheduler);
    let _ticker = start_tick_loop(move || {
        let (Ok(mut scheduler), Ok(store)) = (tick_scheduler.lock(), tick_store.lock()) else {
            return;
        };
        scheduler.tick(&store, &clock, &mut tones, &mut visuals);
    });

    let clock = audio_engine.timing();
    print_help();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => {}

            ["play"] | ["start"] => {
                let (Ok(mut scheduler), Ok(store)) = (scheduler.lock(), store.lock()) else {
                    break;
                };
                match scheduler.start(&store, &clock) {
                    Ok(()) => println!("Playing"),
                    Err(e) => eprintln!("ERROR: {}", e),
                }
            }

            ["pause"] => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    scheduler.pause();
                    println!("Paused");
                }
            }

            ["resume"] => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    scheduler.resume(&clock);
                    println!("Resumed");
                }
            }

            ["stop"] => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    scheduler.stop();
                    println!("Stopped");
                }
            }

            ["tempo", bpm] => match bpm.parse::<u32>() {
                Ok(bpm) => with_store(&store, &session, |store| {
                    store.set_tempo(bpm);
                    println!("Tempo: {} BPM", store.tempo());
                }),
                Err(_) => eprintln!("ERROR: tempo expects a number"),
            },

            ["add"] => with_store(&store, &session, |store| {
                store.add_measure();
                println!("Added measure {}", store.len());
            }),

            ["rm", index] => match parse_index(index) {
                Some(index) => {
                    // Removing the measure under the playhead mid-flight would
                    // let already queued tones play against a stale position
                    if let Ok(mut scheduler) = scheduler.lock() {
                        if scheduler.state().is_playing() && scheduler.playhead().measure == index {
                            scheduler.stop();
                            println!("Stopped (removed the playing measure)");
                        }
                    }
                    with_store(&store, &session, |store| {
                        store.remove_measure(index);
                        println!("{} measure(s) left", store.len());
                    });
                }
                None => eprintln!("ERROR: rm expects a measure number"),
            },

            ["sub", index, count] => match (parse_index(index), count.parse::<usize>()) {
                (Some(index), Ok(count)) => with_store(&store, &session, |store| {
                    store.set_subdivisions(index, count);
                }),
                _ => eprintln!("ERROR: sub expects a measure number and a subdivision count"),
            },

            ["pulse", index, slot] => match (parse_index(index), parse_index(slot)) {
                (Some(index), Some(slot)) => with_store(&store, &session, |store| {
                    store.toggle_pulse(index, slot);
                    if let Some(value) = store.measure(index).and_then(|m| m.pulse(slot)) {
                        println!("Measure {} pulse {}: {}", index + 1, slot + 1, value);
                    }
                }),
                _ => eprintln!("ERROR: pulse expects a measure number and a pulse number"),
            },

            ["edit", "off"] => with_store(&store, &session, |store| {
                store.clear_editing_index();
            }),

            ["edit", index] => match parse_index(index) {
                Some(index) => with_store(&store, &session, |store| {
                    store.set_editing_index(index);
                }),
                None => eprintln!("ERROR: edit expects a measure number or 'off'"),
            },

            ["show"] => {
                if let Ok(store) = store.lock() {
                    print_sequence(&store);
                }
            }

            ["save", path] => {
                if let Ok(store) = store.lock() {
                    match rhythm_weaver::session::export_to_file(path, &store) {
                        Ok(()) => println!("Saved to {}", path),
                        Err(e) => eprintln!("ERROR: {}", e),
                    }
                }
            }

            ["load", path] => match rhythm_weaver::session::import_from_file(path) {
                Ok(data) => with_store(&store, &session, |store| {
                    data.apply_to(store);
                    println!(
                        "Loaded {} measure(s) at {} BPM",
                        store.len(),
                        store.tempo()
                    );
                }),
                // The current sequence is untouched when the file is invalid
                Err(e) => eprintln!("ERROR: {}", e),
            },

            ["help"] => print_help(),

            ["quit"] | ["exit"] => break,

            _ => eprintln!("Unknown command (try 'help')"),
        }
    }

    println!("Bye");
}

/// Run a mutation under the store lock, then auto-save the result
fn with_store(
    store: &Arc<Mutex<PatternStore>>,
    session: &Option<SessionStore>,
    action: impl FnOnce(&mut PatternStore),
) {
    let Ok(mut store) = store.lock() else { return };
    action(&mut store);
    if let Some(session) = session {
        if let Err(e) = session.save(&store) {
            eprintln!("WARNING: auto-save failed: {}", e);
        }
    }
}

/// Parse a 1-based measure/pulse number into a 0-based index
fn parse_index(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

fn print_sequence(store: &PatternStore) {
    println!("Tempo: {} BPM", store.tempo());
    if store.is_empty() {
        println!("(no measures)");
        return;
    }
    for (index, measure) in store.measures().iter().enumerate() {
        let slots: String = measure
            .pattern()
            .iter()
            .map(|pulse| match pulse {
                Pulse::Silent => " . ",
                Pulse::On => " o ",
                Pulse::Accent => " O ",
            })
            .collect();
        let editing = if store.editing_index() == Some(index) {
            "  <- editing"
        } else {
            ""
        };
        println!("{:>3} |{}|{}", index + 1, slots, editing);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  play | pause | resume | stop");
    println!("  tempo <bpm>          set the tempo (1-300)");
    println!("  add                  append a measure");
    println!("  rm <measure>         remove a measure");
    println!("  sub <measure> <n>    set subdivisions (1-16)");
    println!("  pulse <measure> <n>  cycle a pulse: silent -> on -> accent");
    println!("  edit <measure|off>   move the editor cursor");
    println!("  show                 print the sequence");
    println!("  save <path>          export the session to a file");
    println!("  load <path>          import a session file");
    println!("  quit");
}
