//! The game phase state machine.
//!
//! Legal transitions live in a [`TransitionTable`] keyed by
//! `(phase, event)`. Side effects are attached separately as per-phase
//! entry and exit hooks, plus per-event transition hooks, in
//! [`PhaseHooks`], so the table can be inspected (menus, diagrams) without
//! touching any collaborator.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use clocktower_models::GamePhase;
use tracing::{debug, info};

use crate::{Result, SessionError};

// ==================== Events ====================

/// An event that moves the session from one phase to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    FinishConfiguration,
    Start,
    FirstDay,
    StartNominations,
    SkipNominations,
    StartPreReveal,
    StartDay,
    StartNight,
    EndGameViaNomination,
    EndGameViaNight,
    RevertEndGame,
    RestartGame,
}

impl PhaseEvent {
    pub const ALL: [PhaseEvent; 12] = [
        PhaseEvent::FinishConfiguration,
        PhaseEvent::Start,
        PhaseEvent::FirstDay,
        PhaseEvent::StartNominations,
        PhaseEvent::SkipNominations,
        PhaseEvent::StartPreReveal,
        PhaseEvent::StartDay,
        PhaseEvent::StartNight,
        PhaseEvent::EndGameViaNomination,
        PhaseEvent::EndGameViaNight,
        PhaseEvent::RevertEndGame,
        PhaseEvent::RestartGame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseEvent::FinishConfiguration => "finish_configuration",
            PhaseEvent::Start => "start",
            PhaseEvent::FirstDay => "first_day",
            PhaseEvent::StartNominations => "start_nominations",
            PhaseEvent::SkipNominations => "skip_nominations",
            PhaseEvent::StartPreReveal => "start_pre_reveal",
            PhaseEvent::StartDay => "start_day",
            PhaseEvent::StartNight => "start_night",
            PhaseEvent::EndGameViaNomination => "end_game_via_nomination",
            PhaseEvent::EndGameViaNight => "end_game_via_night",
            PhaseEvent::RevertEndGame => "revert_end_game",
            PhaseEvent::RestartGame => "restart_game",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseEvent::FinishConfiguration => "Finish Configuration",
            PhaseEvent::Start => "Start Game",
            PhaseEvent::FirstDay => "Start First Day",
            PhaseEvent::StartNominations => "Start Nominations",
            PhaseEvent::SkipNominations => "Start Night Phase (Skip Nominations)",
            PhaseEvent::StartPreReveal => "Start Pre-Day Phase",
            PhaseEvent::StartDay => "Start Day Phase",
            PhaseEvent::StartNight => "Start Night Phase",
            PhaseEvent::EndGameViaNomination => "End Game via Nomination",
            PhaseEvent::EndGameViaNight => "End Game via Night",
            PhaseEvent::RevertEndGame => "Go Back",
            PhaseEvent::RestartGame => "Restart Game",
        }
    }
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseEvent {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        PhaseEvent::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| SessionError::UnknownAction(s.to_string()))
    }
}

// ==================== Table ====================

/// Which optional phases the machine includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineOptions {
    /// Start in `Configuration` and return there on restart.
    pub with_configuration: bool,
    /// Route `Night -> PreReveal -> Day` instead of `Night -> Day`.
    pub with_pre_reveal: bool,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self::full()
    }
}

impl MachineOptions {
    /// All eight phases.
    pub const fn full() -> Self {
        Self {
            with_configuration: true,
            with_pre_reveal: true,
        }
    }

    /// Six phases: no `Configuration`, no `PreReveal`.
    pub const fn reduced() -> Self {
        Self {
            with_configuration: false,
            with_pre_reveal: false,
        }
    }

    pub fn initial_phase(&self) -> GamePhase {
        if self.with_configuration {
            GamePhase::Configuration
        } else {
            GamePhase::PreGame
        }
    }
}

/// One legal edge of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub event: PhaseEvent,
    pub from: GamePhase,
    pub to: GamePhase,
}

const fn edge(event: PhaseEvent, from: GamePhase, to: GamePhase) -> Transition {
    Transition { event, from, to }
}

/// The fixed set of legal transitions for a machine variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    initial: GamePhase,
    transitions: Vec<Transition>,
}

impl TransitionTable {
    pub fn new(options: MachineOptions) -> Self {
        use GamePhase::*;
        use PhaseEvent::*;

        let home = options.initial_phase();
        let mut transitions = Vec::with_capacity(12);

        if options.with_configuration {
            transitions.push(edge(FinishConfiguration, Configuration, PreGame));
        }
        transitions.push(edge(Start, PreGame, FirstNight));
        transitions.push(edge(FirstDay, FirstNight, Day));
        transitions.push(edge(StartNominations, Day, Nominations));
        transitions.push(edge(SkipNominations, Day, Night));
        if options.with_pre_reveal {
            transitions.push(edge(StartPreReveal, Night, PreReveal));
            transitions.push(edge(StartDay, PreReveal, Day));
        } else {
            transitions.push(edge(StartDay, Night, Day));
        }
        transitions.push(edge(StartNight, Nominations, Night));
        transitions.push(edge(EndGameViaNomination, Nominations, PostGame));
        transitions.push(edge(EndGameViaNight, Night, PostGame));
        transitions.push(edge(RevertEndGame, PostGame, Day));
        transitions.push(edge(RestartGame, PostGame, home));

        Self {
            initial: home,
            transitions,
        }
    }

    pub fn initial(&self) -> GamePhase {
        self.initial
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Target of `event` from `from`, if that edge exists.
    pub fn target(&self, from: GamePhase, event: PhaseEvent) -> Option<GamePhase> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.event == event)
            .map(|t| t.to)
    }

    /// Outgoing edges of `from`, in table order.
    pub fn outgoing(&self, from: GamePhase) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == from)
    }

    /// Phases the variant actually uses, in lifecycle order.
    pub fn phases(&self) -> Vec<GamePhase> {
        GamePhase::ALL
            .into_iter()
            .filter(|phase| {
                *phase == self.initial
                    || self
                        .transitions
                        .iter()
                        .any(|t| t.from == *phase || t.to == *phase)
            })
            .collect()
    }
}

// ==================== Hooks ====================

/// Side-effect callback run on phase entry or exit.
pub type Hook<C> = fn(&mut C);

/// Entry and exit hooks keyed by phase, and transition hooks keyed by event.
pub struct PhaseHooks<C> {
    enter: HashMap<GamePhase, Hook<C>>,
    exit: HashMap<GamePhase, Hook<C>>,
    transition: HashMap<PhaseEvent, Hook<C>>,
}

impl<C> Default for PhaseHooks<C> {
    fn default() -> Self {
        Self {
            enter: HashMap::new(),
            exit: HashMap::new(),
            transition: HashMap::new(),
        }
    }
}

impl<C> PhaseHooks<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(mut self, phase: GamePhase, hook: Hook<C>) -> Self {
        self.enter.insert(phase, hook);
        self
    }

    pub fn on_exit(mut self, phase: GamePhase, hook: Hook<C>) -> Self {
        self.exit.insert(phase, hook);
        self
    }

    /// Runs whenever `event` fires, after the exit hook and before the
    /// phase changes.
    pub fn on_transition(mut self, event: PhaseEvent, hook: Hook<C>) -> Self {
        self.transition.insert(event, hook);
        self
    }

    pub fn has_enter(&self, phase: GamePhase) -> bool {
        self.enter.contains_key(&phase)
    }

    pub fn has_exit(&self, phase: GamePhase) -> bool {
        self.exit.contains_key(&phase)
    }

    pub fn has_transition(&self, event: PhaseEvent) -> bool {
        self.transition.contains_key(&event)
    }

    fn run_enter(&self, phase: GamePhase, ctx: &mut C) {
        if let Some(hook) = self.enter.get(&phase) {
            debug!(phase = %phase, "running entry hook");
            hook(ctx);
        }
    }

    fn run_exit(&self, phase: GamePhase, ctx: &mut C) {
        if let Some(hook) = self.exit.get(&phase) {
            debug!(phase = %phase, "running exit hook");
            hook(ctx);
        }
    }

    fn run_transition(&self, event: PhaseEvent, ctx: &mut C) {
        if let Some(hook) = self.transition.get(&event) {
            debug!(event = %event, "running transition hook");
            hook(ctx);
        }
    }
}

impl<C> fmt::Debug for PhaseHooks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut enter: Vec<_> = self.enter.keys().collect();
        let mut exit: Vec<_> = self.exit.keys().collect();
        let mut transition: Vec<_> = self.transition.keys().map(PhaseEvent::as_str).collect();
        enter.sort();
        exit.sort();
        transition.sort();
        f.debug_struct("PhaseHooks")
            .field("enter", &enter)
            .field("exit", &exit)
            .field("transition", &transition)
            .finish()
    }
}

// ==================== Machine ====================

/// Finite-state machine over [`GamePhase`], generic over the hook context.
#[derive(Debug)]
pub struct PhaseMachine<C> {
    table: TransitionTable,
    hooks: PhaseHooks<C>,
    current: GamePhase,
}

impl<C> PhaseMachine<C> {
    /// Create a machine sitting in the table's initial phase. No hook runs
    /// until [`PhaseMachine::activate`] or the first [`PhaseMachine::fire`].
    pub fn new(table: TransitionTable, hooks: PhaseHooks<C>) -> Self {
        let current = table.initial();
        Self {
            table,
            hooks,
            current,
        }
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Run the initial phase's entry hook.
    pub fn activate(&mut self, ctx: &mut C) {
        self.hooks.run_enter(self.current, ctx);
    }

    pub fn can_fire(&self, event: PhaseEvent) -> bool {
        self.table.target(self.current, event).is_some()
    }

    /// Events legal from the current phase, in table order.
    pub fn available_events(&self) -> Vec<PhaseEvent> {
        self.table.outgoing(self.current).map(|t| t.event).collect()
    }

    /// Apply `event`: exit hook of the current phase, the event's transition
    /// hook, switch, entry hook of the target. Returns the new phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IllegalTransition` if the current phase has no
    /// edge for `event`. Nothing runs and the phase is unchanged.
    pub fn fire(&mut self, event: PhaseEvent, ctx: &mut C) -> Result<GamePhase> {
        let from = self.current;
        let to = self
            .table
            .target(from, event)
            .ok_or(SessionError::IllegalTransition { phase: from, event })?;

        self.hooks.run_exit(from, ctx);
        self.hooks.run_transition(event, ctx);
        self.current = to;
        info!(from = %from, to = %to, event = %event, "phase transition");
        self.hooks.run_enter(to, ctx);

        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_enter_night(log: &mut Vec<String>) {
        log.push("enter night".into());
    }

    fn log_exit_day(log: &mut Vec<String>) {
        log.push("exit day".into());
    }

    fn log_enter_pre_game(log: &mut Vec<String>) {
        log.push("enter pre_game".into());
    }

    fn log_skip(log: &mut Vec<String>) {
        log.push("skip".into());
    }

    fn machine(options: MachineOptions) -> PhaseMachine<Vec<String>> {
        let hooks = PhaseHooks::new()
            .on_enter(GamePhase::Night, log_enter_night)
            .on_exit(GamePhase::Day, log_exit_day)
            .on_enter(GamePhase::PreGame, log_enter_pre_game)
            .on_transition(PhaseEvent::SkipNominations, log_skip);
        PhaseMachine::new(TransitionTable::new(options), hooks)
    }

    #[test]
    fn test_full_table_matches_lifecycle() {
        let table = TransitionTable::new(MachineOptions::full());
        assert_eq!(table.initial(), GamePhase::Configuration);
        assert_eq!(table.transitions().len(), 12);
        assert_eq!(
            table.target(GamePhase::Night, PhaseEvent::StartPreReveal),
            Some(GamePhase::PreReveal)
        );
        assert_eq!(
            table.target(GamePhase::PostGame, PhaseEvent::RestartGame),
            Some(GamePhase::Configuration)
        );
        assert_eq!(table.phases(), GamePhase::ALL.to_vec());
    }

    #[test]
    fn test_reduced_table() {
        let table = TransitionTable::new(MachineOptions::reduced());
        assert_eq!(table.initial(), GamePhase::PreGame);
        assert_eq!(
            table.target(GamePhase::Night, PhaseEvent::StartDay),
            Some(GamePhase::Day)
        );
        assert_eq!(
            table.target(GamePhase::PostGame, PhaseEvent::RestartGame),
            Some(GamePhase::PreGame)
        );
        assert!(table
            .target(GamePhase::Night, PhaseEvent::StartPreReveal)
            .is_none());

        let phases = table.phases();
        assert_eq!(phases.len(), 6);
        assert!(!phases.contains(&GamePhase::Configuration));
        assert!(!phases.contains(&GamePhase::PreReveal));
    }

    #[test]
    fn test_fire_runs_exit_then_enter() {
        let mut log = Vec::new();
        let mut m = machine(MachineOptions::full());
        m.fire(PhaseEvent::FinishConfiguration, &mut log).unwrap();
        m.fire(PhaseEvent::Start, &mut log).unwrap();
        m.fire(PhaseEvent::FirstDay, &mut log).unwrap();
        let phase = m.fire(PhaseEvent::SkipNominations, &mut log).unwrap();

        assert_eq!(phase, GamePhase::Night);
        assert_eq!(
            log,
            vec!["enter pre_game", "exit day", "skip", "enter night"]
        );
    }

    #[test]
    fn test_illegal_transition_leaves_phase_unchanged() {
        let mut log = Vec::new();
        let mut m = machine(MachineOptions::full());
        let err = m.fire(PhaseEvent::StartNight, &mut log).unwrap_err();

        assert!(matches!(
            err,
            SessionError::IllegalTransition {
                phase: GamePhase::Configuration,
                event: PhaseEvent::StartNight
            }
        ));
        assert_eq!(m.current(), GamePhase::Configuration);
        assert!(log.is_empty());
    }

    #[test]
    fn test_every_pair_outside_table_is_rejected() {
        for options in [MachineOptions::full(), MachineOptions::reduced()] {
            let table = TransitionTable::new(options);
            for phase in GamePhase::ALL {
                for event in PhaseEvent::ALL {
                    let mut m: PhaseMachine<()> =
                        PhaseMachine::new(table.clone(), PhaseHooks::new());
                    m.current = phase;
                    let result = m.fire(event, &mut ());
                    match table.target(phase, event) {
                        Some(to) => assert_eq!(result.unwrap(), to),
                        None => {
                            assert!(result.is_err());
                            assert_eq!(m.current(), phase);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_dead_ends() {
        for options in [MachineOptions::full(), MachineOptions::reduced()] {
            let table = TransitionTable::new(options);
            for phase in table.phases() {
                assert!(
                    table.outgoing(phase).next().is_some(),
                    "{} has no outgoing edge",
                    phase
                );
            }
        }
    }

    #[test]
    fn test_activate_runs_initial_entry_hook() {
        let mut log = Vec::new();
        let mut m = machine(MachineOptions::reduced());
        m.activate(&mut log);
        assert_eq!(log, vec!["enter pre_game"]);
    }

    #[test]
    fn test_event_names_parse() {
        for event in PhaseEvent::ALL {
            assert_eq!(event.as_str().parse::<PhaseEvent>().unwrap(), event);
        }
        assert!(matches!(
            "dance".parse::<PhaseEvent>(),
            Err(SessionError::UnknownAction(_))
        ));
    }
}
