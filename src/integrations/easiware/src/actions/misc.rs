//! Status, auth info, categories and users

use super::{query_from_props, Action, ActionDefinition};
use crate::error::PieceResult;
use crate::props::{options, Property, PropsValue};
use crate::request::ApiRequest;
use crate::utils::StringUtils;

pub struct GetApiStatus;

impl Action for GetApiStatus {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_api_status",
            display_name: "Get API Status",
            description: "Retrieve the public API status",
            props: Vec::new(),
        }
    }

    fn build(&self, _props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get("/v1/status"))
    }
}

pub struct GetAuthInfo;

impl Action for GetAuthInfo {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_auth_info",
            display_name: "Get Auth Info",
            description: "Retrieve details about the current API key",
            props: Vec::new(),
        }
    }

    fn build(&self, _props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get("/v1/auth/info"))
    }
}

pub struct SearchCategories;

impl Action for SearchCategories {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "search_categories",
            display_name: "Search Categories",
            description: "Search your organization's categories",
            props: vec![
                Property::short_text("search", "Search"),
                Property::checkbox("active", "Active only"),
                Property::checkbox("public", "Public only"),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get("/v1/categories").with_query(query_from_props(props)))
    }
}

pub struct GetCategory;

impl Action for GetCategory {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_category_from_id",
            display_name: "Get Category by ID",
            description: "Retrieve a category using its easiware internal ID",
            props: vec![Property::short_text("id", "Category ID").required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/categories/{}",
            StringUtils::path_segment(&props.require_text("id")?)
        )))
    }
}

pub struct SearchUsers;

impl Action for SearchUsers {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "search_users",
            display_name: "Search Users",
            description: "Search your organization's users",
            props: vec![
                Property::short_text("search", "Search"),
                Property::short_text("email", "Email"),
                Property::checkbox("enabled", "Enabled only"),
                Property::static_dropdown(
                    "role",
                    "Role",
                    options(&[("Owner", "owner"), ("Admin", "admin"), ("Agent", "agent")]),
                ),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get("/v1/users").with_query(query_from_props(props)))
    }
}

pub struct GetUser;

impl Action for GetUser {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_user_from_id",
            display_name: "Get User by ID",
            description: "Retrieve a user by easiware internal ID",
            props: vec![Property::short_text("id", "User ID").required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/users/{}",
            StringUtils::path_segment(&props.require_text("id")?)
        )))
    }
}
