use std::sync::atomic::{AtomicU8, Ordering};

use shared::FurnitureKind;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=Ru (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::En,
        _ => Lang::Ru,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Localized furniture name
pub fn kind_name(kind: FurnitureKind) -> &'static str {
    let ru = lang() == Lang::Ru;
    match kind {
        FurnitureKind::Bed => if ru { "Кровать" } else { kind.display_name() },
        FurnitureKind::Desk => if ru { "Стол" } else { kind.display_name() },
        FurnitureKind::Chair => if ru { "Стул" } else { kind.display_name() },
        FurnitureKind::Wardrobe => if ru { "Шкаф" } else { kind.display_name() },
    }
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.edit" => if ru { "Правка" } else { "Edit" },
        "menu.undo" => if ru { "Отменить  Ctrl+Z" } else { "Undo  Ctrl+Z" },
        "menu.redo" => if ru { "Повторить  Ctrl+Shift+Z" } else { "Redo  Ctrl+Shift+Z" },
        "menu.rotate" => if ru { "Повернуть  R" } else { "Rotate  R" },
        "menu.delete" => if ru { "Удалить  Del" } else { "Delete  Del" },
        "menu.clear" => if ru { "Очистить комнату" } else { "Clear room" },
        "menu.deselect" => if ru { "Снять выделение  Esc" } else { "Deselect  Esc" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "menu.retry_loads" => if ru { "Повторить загрузку моделей" } else { "Retry failed models" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Palette ─────────────────────────────────────────
        "palette.title" => if ru { "Мебель" } else { "Furniture" },
        "palette.hint" => if ru { "Перетащите предмет в комнату" } else { "Drag an item into the room" },

        // ── Toolbar ─────────────────────────────────────────
        "toolbar.rotate" => if ru { "⟳ Повернуть" } else { "⟳ Rotate" },
        "toolbar.delete" => if ru { "🗑 Удалить" } else { "🗑 Delete" },
        "toolbar.clear" => if ru { "Очистить" } else { "Clear" },
        "toolbar.undo" => "↶",
        "toolbar.redo" => "↷",
        "toolbar.undo_tip" => if ru { "Отменить (Ctrl+Z)" } else { "Undo (Ctrl+Z)" },
        "toolbar.redo_tip" => if ru { "Повторить (Ctrl+Shift+Z)" } else { "Redo (Ctrl+Shift+Z)" },
        "toolbar.rotate_tip" => if ru { "Повернуть на 90°" } else { "Rotate by 90°" },

        // ── Status bar ──────────────────────────────────────
        "status.items" => if ru { "Предметов" } else { "Items" },
        "status.selected" => if ru { "Выбрано" } else { "Selected" },
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.dragging" => if ru { "Перемещение" } else { "Moving" },
        "status.loading" => if ru { "Загрузка моделей" } else { "Loading models" },
        "status.failed" => if ru { "Не загружено" } else { "Failed to load" },
        "status.nav_hint" => if ru {
            "ПКМ: вращение, СКМ: сдвиг, колесо: масштаб"
        } else {
            "RMB: orbit, MMB: pan, wheel: zoom"
        },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(t("no.such.key"), "???");
    }

    #[test]
    fn test_every_kind_has_a_name() {
        for kind in FurnitureKind::ALL {
            assert!(!kind_name(kind).is_empty());
        }
    }
}
