use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

/// Идентификатор окна X11
pub type WindowId = u32;

new_key_type! {
    /// Ключ клиента в арене: индекс + поколение.
    /// После освобождения клиента все старые ключи становятся недействительными.
    pub struct ClientKey;
}

/// Геометрия окна (ширины полей как у xcb_rectangle_t)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Клиент оконного менеджера. Владеет им только реестр клиентов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub window: WindowId,
    pub geometry: Geometry,
    pub border_width: u16,
    pub(crate) next: Option<ClientKey>,
}

impl Client {
    pub fn new(window: WindowId, geometry: Geometry, border_width: u16) -> Self {
        Self {
            window,
            geometry,
            border_width,
            next: None,
        }
    }

    pub fn next(&self) -> Option<ClientKey> {
        self.next
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client {} [{}]", self.window, self.geometry)
    }
}

/// Ответ на запрос дерева окон
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTree {
    pub root: WindowId,
    pub parent: WindowId,
    pub children_len: u32,
}

/// Размеры экрана, которые ядро сообщает при старте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    pub width: u16,
    pub height: u16,
    pub root: WindowId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new(42, Geometry::new(-5, 10, 640, 480), 2);

        assert_eq!(client.window, 42);
        assert_eq!(client.geometry.x, -5);
        assert_eq!(client.border_width, 2);
        assert_eq!(client.next(), None);
    }

    #[test]
    fn test_geometry_display() {
        let geometry = Geometry::new(-5, 100, 800, 600);
        assert_eq!(geometry.to_string(), "800x600+-5+100");
        assert_eq!(
            Client::new(7, geometry, 1).to_string(),
            "client 7 [800x600+-5+100]"
        );
    }
}
