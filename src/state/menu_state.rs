// ============================================================================
// MENU STATE - Menú de usuario y menú móvil
// ============================================================================
// Dos booleanos independientes. Cada transición devuelve si hubo cambio.
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub user_menu_open: bool,
    pub mobile_menu_open: bool,
}

impl MenuState {
    pub fn toggle_user_menu(&mut self) -> bool {
        self.user_menu_open = !self.user_menu_open;
        true
    }

    pub fn close_user_menu(&mut self) -> bool {
        std::mem::replace(&mut self.user_menu_open, false)
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        true
    }

    pub fn close_mobile_menu(&mut self) -> bool {
        std::mem::replace(&mut self.mobile_menu_open, false)
    }

    /// `mousedown` en el documento; fuera del menú móvil lo cierra
    pub fn pointer_down(&mut self, inside_mobile_menu: bool) -> bool {
        if inside_mobile_menu {
            return false;
        }
        self.close_mobile_menu()
    }

    /// Navegación atrás/adelante (`popstate`)
    pub fn history_navigated(&mut self) -> bool {
        self.close_mobile_menu()
    }

    /// Selección de cualquier enlace o acción del menú móvil
    pub fn mobile_item_selected(&mut self) -> bool {
        self.close_mobile_menu()
    }
}
