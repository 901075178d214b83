// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

/// Lifecycle state of an appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Constructed, never started.
    Initialized,
    /// Accepting records.
    Started,
    /// Stopped, or detached from its logger configuration.
    Stopped,
}

/// Lock-free holder of a [`State`] for appender implementations.
#[derive(Debug)]
pub struct LifeCycle(AtomicU8);

impl Default for LifeCycle {
    fn default() -> Self {
        LifeCycle(AtomicU8::new(State::Initialized as u8))
    }
}

impl LifeCycle {
    /// Returns the current state.
    pub fn state(&self) -> State {
        match self.0.load(Ordering::Acquire) {
            0 => State::Initialized,
            1 => State::Started,
            _ => State::Stopped,
        }
    }

    /// Transitions to `state`, returning the previous one.
    pub fn set(&self, state: State) -> State {
        match self.0.swap(state as u8, Ordering::AcqRel) {
            0 => State::Initialized,
            1 => State::Started,
            _ => State::Stopped,
        }
    }
}
