use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор предмета мебели (монотонный счётчик)
pub type ItemId = u64;

/// Шаг поворота предмета, в градусах
pub const ROTATION_STEP_DEGREES: u16 = 90;

/// Тип размещаемого предмета мебели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    Bed,
    Desk,
    Chair,
    Wardrobe,
}

impl FurnitureKind {
    /// Все типы в порядке палитры
    pub const ALL: [FurnitureKind; 4] = [
        FurnitureKind::Bed,
        FurnitureKind::Desk,
        FurnitureKind::Chair,
        FurnitureKind::Wardrobe,
    ];

    /// Имя типа в полезной нагрузке drag-and-drop
    pub fn name(&self) -> &'static str {
        match self {
            FurnitureKind::Bed => "bed",
            FurnitureKind::Desk => "desk",
            FurnitureKind::Chair => "chair",
            FurnitureKind::Wardrobe => "wardrobe",
        }
    }

    /// Отображаемое имя для палитры
    pub fn display_name(&self) -> &'static str {
        match self {
            FurnitureKind::Bed => "Bed",
            FurnitureKind::Desk => "Desk",
            FurnitureKind::Chair => "Chair",
            FurnitureKind::Wardrobe => "Wardrobe",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FurnitureKind::Bed => "🛏",
            FurnitureKind::Desk => "🖥",
            FurnitureKind::Chair => "🪑",
            FurnitureKind::Wardrobe => "🚪",
        }
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ошибка разбора имени типа мебели
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown furniture kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for FurnitureKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FurnitureKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownKind(name.to_string()))
    }
}

/// Точка на плоскости комнаты: x по мировой оси X, y по мировой оси Z
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomPosition {
    pub x: f32,
    pub y: f32,
}

impl RoomPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Размещённый предмет мебели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureRecord {
    pub id: ItemId,
    pub kind: FurnitureKind,
    pub position: RoomPosition,
    /// Поворот вокруг вертикальной оси, всегда в диапазоне [0, 360)
    pub rotation_degrees: u16,
}

impl FurnitureRecord {
    /// Новый предмет без поворота
    pub fn new(id: ItemId, kind: FurnitureKind, position: RoomPosition) -> Self {
        Self {
            id,
            kind,
            position,
            rotation_degrees: 0,
        }
    }

    /// Повернуть на один шаг с переходом через 360
    pub fn rotate_step(&mut self) -> u16 {
        self.rotation_degrees = (self.rotation_degrees % 360 + ROTATION_STEP_DEGREES) % 360;
        self.rotation_degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("desk".parse::<FurnitureKind>(), Ok(FurnitureKind::Desk));
        assert_eq!(" Bed ".parse::<FurnitureKind>(), Ok(FurnitureKind::Bed));
        assert!("lamp".parse::<FurnitureKind>().is_err());
    }

    #[test]
    fn test_kind_serde_names_match_payload_names() {
        for kind in FurnitureKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_rotate_wraps() {
        let mut record = FurnitureRecord::new(1, FurnitureKind::Chair, RoomPosition::default());
        record.rotation_degrees = 270;
        assert_eq!(record.rotate_step(), 0);
    }

    #[test]
    fn test_four_rotations_identity() {
        for start in [0u16, 45, 90, 180, 270, 359] {
            let mut record = FurnitureRecord::new(1, FurnitureKind::Bed, RoomPosition::default());
            record.rotation_degrees = start;
            for _ in 0..4 {
                record.rotate_step();
            }
            assert_eq!(record.rotation_degrees, start);
        }
    }
}
