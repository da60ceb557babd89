//! Page routes, layout selection and role-based access decisions.

use crate::domain::model::SessionUser;

/// Paths whose pages are wrapped in the navigation layout.
pub const LAYOUT_PREFIXES: [&str; 6] = [
    "/profile",
    "/dashboard",
    "/signo",
    "/_usuarios",
    "/register",
    "/logs",
];

pub const NOT_FOUND_MESSAGE: &str =
    "Uy... Parece que esta página no existe o el enlace está roto.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Dashboard,
    Profile,
    Diccionario { search: Option<String> },
    SignoDetalle { palabra: String },
    SignoCrear,
    SignoLista,
    SignoEditar { id: i64 },
    Usuarios,
    Register,
    Logs,
    NotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The session has not finished loading yet.
    Pending,
    Allow,
    Redirect(String),
    /// Render an access-denied notice in place.
    Deny,
}

impl Route {
    pub fn parse(raw: &str) -> Route {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["dashboard"] => Route::Dashboard,
            ["profile"] => Route::Profile,
            ["diccionario"] => Route::Diccionario {
                search: query.and_then(search_param),
            },
            ["signo", "crear"] => Route::SignoCrear,
            ["signo", "signos"] => Route::SignoLista,
            ["signo", "editar", id] => match id.parse() {
                Ok(id) => Route::SignoEditar { id },
                Err(_) => Route::NotFound {
                    path: raw.to_string(),
                },
            },
            ["signo", palabra] => Route::SignoDetalle {
                palabra: percent_decode(palabra),
            },
            ["_usuarios"] => Route::Usuarios,
            ["register"] => Route::Register,
            ["logs"] => Route::Logs,
            _ => Route::NotFound {
                path: raw.to_string(),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Diccionario { search: None } => "/diccionario".to_string(),
            Route::Diccionario {
                search: Some(search),
            } => format!("/diccionario?search={}", encode_component(search)),
            Route::SignoDetalle { palabra } => format!("/signo/{}", encode_component(palabra)),
            Route::SignoCrear => "/signo/crear".to_string(),
            Route::SignoLista => "/signo/signos".to_string(),
            Route::SignoEditar { id } => format!("/signo/editar/{}", id),
            Route::Usuarios => "/_usuarios".to_string(),
            Route::Register => "/register".to_string(),
            Route::Logs => "/logs".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Home
            | Route::Dashboard
            | Route::Diccionario { .. }
            | Route::SignoDetalle { .. }
            | Route::NotFound { .. } => Requirement::Public,
            Route::Profile | Route::SignoCrear | Route::SignoLista | Route::SignoEditar { .. } => {
                Requirement::Authenticated
            }
            Route::Usuarios | Route::Register | Route::Logs => Requirement::Admin,
        }
    }

    pub fn uses_layout(&self) -> bool {
        uses_layout(&self.path())
    }
}

pub fn uses_layout(path: &str) -> bool {
    LAYOUT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Decides what happens when `route` is visited with the given session.
pub fn check_access(route: &Route, user: Option<&SessionUser>, loading: bool) -> AccessDecision {
    if loading {
        return AccessDecision::Pending;
    }
    let requirement = route.requirement();

    match (requirement, user) {
        (Requirement::Authenticated, Some(_)) => AccessDecision::Allow,
        (Requirement::Authenticated, None) => AccessDecision::Redirect(Route::Home.path()),
        (Requirement::Admin, Some(user)) if user.is_admin() => AccessDecision::Allow,
        // registration bounces back home, the admin lists show a notice instead
        (Requirement::Admin, _) if *route == Route::Register => {
            AccessDecision::Redirect(Route::Home.path())
        }
        (Requirement::Admin, _) => AccessDecision::Deny,
        (Requirement::Public, _) => AccessDecision::Allow,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub href: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavMenu {
    pub title: &'static str,
    pub footer: &'static str,
    pub items: Vec<MenuItem>,
}

const CREAR_SIGNO: MenuItem = MenuItem {
    href: "/signo/crear",
    label: "Crear Signo",
    description: "Agregar nuevo signo al diccionario",
};
const DICCIONARIO: MenuItem = MenuItem {
    href: "/diccionario",
    label: "Diccionario",
    description: "Explorar todos los signos",
};
const SIGNOS: MenuItem = MenuItem {
    href: "/signo/signos",
    label: "Signos",
    description: "Listado de signos",
};

fn admin_menu() -> NavMenu {
    NavMenu {
        title: "Administración",
        footer: "Panel de Administración",
        items: vec![
            MenuItem {
                href: "/_usuarios",
                label: "Gestión de Usuarios",
                description: "Ver y administrar usuarios",
            },
            MenuItem {
                href: "/logs",
                label: "Logs del Sistema",
                description: "Revisar actividad del sistema",
            },
            MenuItem {
                href: "/register",
                label: "Registrar Usuario",
                description: "Crear nuevas cuentas",
            },
            CREAR_SIGNO,
            DICCIONARIO,
            SIGNOS,
        ],
    }
}

fn user_menu() -> NavMenu {
    NavMenu {
        title: "Herramientas",
        footer: "Herramientas de Usuario",
        items: vec![CREAR_SIGNO, DICCIONARIO, SIGNOS],
    }
}

/// Header chrome for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub brand_href: &'static str,
    pub menu: Option<NavMenu>,
    pub username: Option<String>,
    pub session_action: &'static str,
}

pub fn layout_for(user: Option<&SessionUser>) -> Layout {
    match user {
        Some(user) => Layout {
            brand_href: "/dashboard",
            menu: Some(if user.is_admin() {
                admin_menu()
            } else {
                user_menu()
            }),
            username: Some(user.username.clone()).filter(|u| !u.is_empty()),
            session_action: "Cerrar Sesión",
        },
        None => Layout {
            brand_href: "/dashboard",
            menu: None,
            username: None,
            session_action: "Iniciar Sesión",
        },
    }
}

fn search_param(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "search")
        .map(|(_, value)| percent_decode(&value.replace('+', " ")))
        .filter(|value| !value.is_empty())
}

/// Percent-encodes everything outside the unreserved set.
pub fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn percent_decode(raw: &str) -> String {
    url::form_urlencoded::parse(format!("v={}", raw.replace('+', "%2B")).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Rol;

    fn user(rol: &str) -> SessionUser {
        SessionUser {
            username: "ana".to_string(),
            email: None,
            rol: Some(Rol::from(rol)),
        }
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/signo/crear"), Route::SignoCrear);
        assert_eq!(Route::parse("/signo/editar/12"), Route::SignoEditar { id: 12 });
        assert_eq!(
            Route::parse("/signo/%C3%81rbol"),
            Route::SignoDetalle {
                palabra: "Árbol".to_string()
            }
        );
        assert_eq!(
            Route::parse("/diccionario?search=buenos%20d%C3%ADas"),
            Route::Diccionario {
                search: Some("buenos días".to_string())
            }
        );
        assert!(matches!(Route::parse("/admin"), Route::NotFound { .. }));
        assert!(matches!(
            Route::parse("/signo/editar/abc"),
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn test_path_round_trip_encodes_palabra() {
        let route = Route::SignoDetalle {
            palabra: "buen día".to_string(),
        };
        assert_eq!(route.path(), "/signo/buen%20d%C3%ADa");
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn test_layout_prefixes() {
        assert!(uses_layout("/signo/signos"));
        assert!(uses_layout("/_usuarios"));
        assert!(!uses_layout("/"));
        assert!(!uses_layout("/diccionario"));
        assert!(Route::Logs.uses_layout());
    }

    #[test]
    fn test_admin_pages_guarding() {
        let admin = user("ADMIN");
        let plain = user("user");

        assert_eq!(
            check_access(&Route::Usuarios, Some(&admin), false),
            AccessDecision::Allow
        );
        assert_eq!(
            check_access(&Route::Usuarios, Some(&plain), false),
            AccessDecision::Deny
        );
        assert_eq!(check_access(&Route::Logs, None, false), AccessDecision::Deny);
        assert_eq!(
            check_access(&Route::Register, Some(&plain), false),
            AccessDecision::Redirect("/".to_string())
        );
        assert_eq!(
            check_access(&Route::Register, None, true),
            AccessDecision::Pending
        );
    }

    #[test]
    fn test_authenticated_pages_guarding() {
        assert_eq!(
            check_access(&Route::Profile, None, false),
            AccessDecision::Redirect("/".to_string())
        );
        assert_eq!(
            check_access(&Route::SignoCrear, Some(&user("guest")), false),
            AccessDecision::Allow
        );
        assert_eq!(
            check_access(&Route::parse("/diccionario"), None, false),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_loading_session_is_pending_for_every_route() {
        for path in ["/", "/diccionario", "/signo/casa", "/profile", "/logs"] {
            assert_eq!(
                check_access(&Route::parse(path), None, true),
                AccessDecision::Pending,
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_menus_by_role() {
        let admin_layout = layout_for(Some(&user("admin")));
        let menu = admin_layout.menu.unwrap();
        assert_eq!(menu.title, "Administración");
        assert_eq!(menu.items.len(), 6);
        assert_eq!(menu.items[0].href, "/_usuarios");
        assert_eq!(admin_layout.session_action, "Cerrar Sesión");

        let menu = layout_for(Some(&user("user"))).menu.unwrap();
        assert_eq!(menu.title, "Herramientas");
        assert_eq!(menu.footer, "Herramientas de Usuario");
        assert_eq!(
            menu.items.iter().map(|i| i.href).collect::<Vec<_>>(),
            vec!["/signo/crear", "/diccionario", "/signo/signos"]
        );

        let anonymous = layout_for(None);
        assert!(anonymous.menu.is_none());
        assert_eq!(anonymous.session_action, "Iniciar Sesión");
    }
}
