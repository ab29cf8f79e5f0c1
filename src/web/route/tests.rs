use super::*;

fn nobody(_: Capability) -> bool {
    false
}

fn admin(_: Capability) -> bool {
    true
}

// =========================================================
// Path mapping
// =========================================================

#[test]
fn root_and_dashboard_map_to_chat() {
    assert_eq!(AppRoute::from_path("/"), AppRoute::Chat);
    assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Chat);
}

#[test]
fn known_paths_round_trip() {
    for route in [
        AppRoute::Login,
        AppRoute::Chat,
        AppRoute::Download,
        AppRoute::Statistics,
        AppRoute::AccountManage,
        AppRoute::CreateAccount,
        AppRoute::SystemSettings,
    ] {
        assert_eq!(AppRoute::from_path(route.path()), route);
    }
}

#[test]
fn unknown_path_is_not_found() {
    assert_eq!(AppRoute::from_path("/no-such-page"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_path(""), AppRoute::NotFound);
}

#[test]
fn display_matches_path() {
    assert_eq!(AppRoute::AccountManage.to_string(), "/account-manage");
}

// =========================================================
// Access policy
// =========================================================

#[test]
fn only_login_and_not_found_are_public() {
    for route in [AppRoute::Login, AppRoute::NotFound] {
        assert!(!route.requires_auth());
    }
    for route in [
        AppRoute::Chat,
        AppRoute::Download,
        AppRoute::Statistics,
        AppRoute::AccountManage,
        AppRoute::CreateAccount,
        AppRoute::SystemSettings,
    ] {
        assert!(route.requires_auth(), "{route} should require auth");
    }
}

#[test]
fn admin_routes_declare_the_capability() {
    for route in [
        AppRoute::AccountManage,
        AppRoute::CreateAccount,
        AppRoute::SystemSettings,
    ] {
        assert_eq!(route.required_capability(), Some(Capability::Admin));
    }
    assert_eq!(AppRoute::Chat.required_capability(), None);
    assert_eq!(AppRoute::Login.required_capability(), None);
}

#[test]
fn every_route_has_a_title() {
    for path in [
        "/login",
        "/dashboard",
        "/download",
        "/statistics",
        "/account-manage",
        "/create-account",
        "/system-settings",
        "/missing",
    ] {
        assert!(!AppRoute::from_path(path).title().is_empty());
    }
}

// =========================================================
// Admission: authentication gate
// =========================================================

#[test]
fn unauthenticated_protected_route_redirects_to_login() {
    for route in [
        AppRoute::Chat,
        AppRoute::Download,
        AppRoute::Statistics,
        AppRoute::AccountManage,
    ] {
        assert_eq!(
            route.admit(false, nobody),
            Admission::Redirect {
                target: AppRoute::Login,
                notice: None,
            },
            "{route} must bounce to login"
        );
    }
}

#[test]
fn auth_gate_runs_before_capability_gate() {
    // 未认证用户访问管理员页面必须落到登录页，而不是落地页，
    // 也不应产生权限提示。
    assert_eq!(
        AppRoute::SystemSettings.admit(false, nobody),
        Admission::Redirect {
            target: AppRoute::Login,
            notice: None,
        }
    );
}

#[test]
fn unauthenticated_login_is_allowed() {
    assert_eq!(AppRoute::Login.admit(false, nobody), Admission::Allow);
}

#[test]
fn not_found_is_always_allowed() {
    assert_eq!(AppRoute::NotFound.admit(false, nobody), Admission::Allow);
    assert_eq!(AppRoute::NotFound.admit(true, admin), Admission::Allow);
}

// =========================================================
// Admission: capability gate
// =========================================================

#[test]
fn non_admin_is_bounced_from_admin_routes_with_notice() {
    for route in [
        AppRoute::AccountManage,
        AppRoute::CreateAccount,
        AppRoute::SystemSettings,
    ] {
        assert_eq!(
            route.admit(true, nobody),
            Admission::Redirect {
                target: AppRoute::Chat,
                notice: Some(NOTICE_FORBIDDEN),
            },
            "{route} must bounce a standard user"
        );
    }
}

#[test]
fn admin_reaches_admin_routes() {
    for route in [
        AppRoute::AccountManage,
        AppRoute::CreateAccount,
        AppRoute::SystemSettings,
    ] {
        assert_eq!(route.admit(true, admin), Admission::Allow);
    }
}

#[test]
fn ordinary_routes_do_not_consult_capabilities() {
    assert_eq!(AppRoute::Chat.admit(true, nobody), Admission::Allow);
    assert_eq!(AppRoute::Statistics.admit(true, nobody), Admission::Allow);
}

// =========================================================
// Admission: login page for authenticated users
// =========================================================

#[test]
fn authenticated_login_visit_redirects_to_landing() {
    assert_eq!(
        AppRoute::Login.admit(true, nobody),
        Admission::Redirect {
            target: AppRoute::Chat,
            notice: None,
        }
    );
}

// =========================================================
// Menu
// =========================================================

#[test]
fn menu_lists_all_dashboard_entries_in_order() {
    let menu = AppRoute::menu();
    assert_eq!(menu.len(), 6);
    assert_eq!(menu[0], AppRoute::Chat);
    assert!(!menu.contains(&AppRoute::Login));
    assert!(!menu.contains(&AppRoute::NotFound));
}
