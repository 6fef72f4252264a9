//! Field-wide conditions: weather and terrain.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weather {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Grassy,
    Electric,
    Misty,
}

/// A field condition with a remaining duration in turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedField<T> {
    pub kind: T,
    pub turns_left: u8,
}

impl<T> TimedField<T> {
    pub fn new(kind: T, turns_left: u8) -> Self {
        Self { kind, turns_left }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldState {
    pub weather: Option<TimedField<Weather>>,
    pub terrain: Option<TimedField<Terrain>>,
}

impl FieldState {
    pub fn weather(&self) -> Option<Weather> {
        self.weather.map(|w| w.kind)
    }

    pub fn terrain(&self) -> Option<Terrain> {
        self.terrain.map(|t| t.kind)
    }

    /// Decrements both durations, returning which conditions expired.
    pub fn tick(&mut self) -> (Option<Weather>, Option<Terrain>) {
        let expired_weather = Self::tick_one(&mut self.weather);
        let expired_terrain = Self::tick_one(&mut self.terrain);
        (expired_weather, expired_terrain)
    }

    fn tick_one<T: Copy>(slot: &mut Option<TimedField<T>>) -> Option<T> {
        let field = slot.as_mut()?;
        field.turns_left = field.turns_left.saturating_sub(1);
        if field.turns_left == 0 {
            let kind = field.kind;
            *slot = None;
            return Some(kind);
        }
        None
    }
}
