// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema description rendering for SQL generation prompts.
//!
//! The description is derived from static table metadata plus the bound
//! tenant, and is regenerated per request -- the tenant can change between
//! turns, and the rendering is cheap.

use reva_core::types::TenantContext;

/// Renders the listings schema as a prompt text block.
///
/// When a tenant is bound, an explicit reminder block containing the literal
/// tenant identifier is prepended so the generator injects the equality
/// filter into every statement, including joins.
pub fn schema_description(tenant: &TenantContext) -> String {
    let tenant_filter_note = match tenant.id() {
        Some(id) => format!(
            "\nIMPORTANT TENANT FILTERING:\n\
             - Current tenant_id: '{id}'\n\
             - ALWAYS add: WHERE tenant_id = '{id}' to filter by this specific client\n\
             - For projects table: WHERE tenant_id = '{id}'\n\
             - For project_units table: WHERE tenant_id = '{id}'\n\
             - For JOINs: add the tenant_id filter to both tables or the result set\n"
        ),
        None => String::new(),
    };

    format!(
        "\
DATABASE: real estate listings
{tenant_filter_note}
TABLE: projects
Columns:
- project_id (TEXT PRIMARY KEY)
- tenant_id (TEXT NOT NULL) - client/tenant identifier
- project_name (TEXT NOT NULL) - name of the real estate project
- developer_name (TEXT NOT NULL) - builder/developer name
- city (TEXT NOT NULL)
- description (TEXT)
- total_project_area_acres (DECIMAL)
- open_space_percentage (DECIMAL)
- number_of_towers (INTEGER)
- total_units_count (INTEGER)
- tower_structure_details (TEXT)
- is_block_wing_structure (BOOLEAN)
- rera_registration_number (TEXT)
- approval_body (TEXT)
- launch_date, sales_launch_date, construction_start_date (DATE)
- rera_possession_date, estimated_possession_date (DATE)
- construction_status (VARCHAR) - values: 'Under Construction', 'Completed', 'Ready to Move'
- completion_percentage (DECIMAL)
- construction_technology (TEXT)
- stamp_duty_percentage, registration_charges_percentage (DECIMAL)
- construction_partners (TEXT)
- amenities, payment_plans, unique_selling_propositions (TEXT - JSON)
- schools, colleges, hospitals, it_parks_companies (TEXT)
- nearby_top_places, shopping_malls, health_fitness (TEXT)
- connecting_roads, metro_stations, bus_stands, airport_distance (TEXT)
- created_at, modified_at (TIMESTAMP)

TABLE: project_units
Columns:
- unit_id (TEXT PRIMARY KEY)
- project_id (TEXT - FOREIGN KEY to projects.project_id)
- tenant_id (TEXT NOT NULL) - client/tenant identifier
- configuration_type (VARCHAR) - examples: '2BHK', '3BHK', '4BHK', 'Villa'
- property_type (VARCHAR) - examples: 'Apartment', 'Villa', 'Penthouse'
- built_up_area_sqft (DECIMAL)
- carpet_area_sqft (DECIMAL)
- base_price (DECIMAL) - price in currency
- current_average_psf (DECIMAL) - price per square foot
- market_psf (DECIMAL)
- view_premium_details, high_floor_premium_details, corner_unit_premium_details (TEXT)
- last_price_revision_date, next_planned_revision_date (DATE)
- last_price_change_percentage (DECIMAL)
- current_festive_offers (TEXT)
- created_at (TIMESTAMP)

IMPORTANT SQL GUIDELINES:
- Use JOIN to combine project and unit information
- For combined queries: SELECT p.project_name, u.* FROM projects p JOIN project_units u ON p.project_id = u.project_id WHERE ...
- Use LIKE for pattern matching on text fields (developer_name, project_name, city)
  Example: WHERE developer_name LIKE '%Casagrand%' or WHERE project_name LIKE '%Purva%'
- Configuration type pattern matching: WHERE configuration_type LIKE '%3BHK%'
- Count projects: SELECT COUNT(*) FROM projects
- Count units: SELECT COUNT(*) FROM project_units
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_tenant_renders_no_filter_block() {
        let schema = schema_description(&TenantContext::unbound());
        assert!(!schema.contains("TENANT FILTERING"));
        assert!(schema.contains("TABLE: projects"));
        assert!(schema.contains("TABLE: project_units"));
    }

    #[test]
    fn bound_tenant_renders_literal_identifier() {
        let schema = schema_description(&TenantContext::bound("TM_TEAM_001"));
        assert!(schema.contains("IMPORTANT TENANT FILTERING"));
        assert!(schema.contains("WHERE tenant_id = 'TM_TEAM_001'"));
        // The join reminder is part of the contract: filtered joins, not
        // just filtered top-level tables.
        assert!(schema.contains("For JOINs"));
    }

    #[test]
    fn schema_regenerates_per_tenant() {
        let a = schema_description(&TenantContext::bound("A"));
        let b = schema_description(&TenantContext::bound("B"));
        assert!(a.contains("'A'"));
        assert!(b.contains("'B'"));
        assert!(!b.contains("'A'"));
    }
}
