//! 0.6.3 -> 0.7.0 migrations for the legacy arc nodes.
//!
//! The host-specific arc nodes were replaced by calls into the geometry
//! library. `ArcStartMiddleEnd` maps port for port; `ArcCenter` took start
//! and end parameters where the library takes a start angle and a sweep, so
//! its migration inserts a subtraction node and feeds the arc a normal.

use dynmig_core::PortId;

use crate::data::NodeMigrationData;
use crate::element::{
    create_canonical_element, duplicate_with_all_attributes, guid_of, migrate_to_canonical,
    ASSEMBLY_ATTRIBUTE, FUNCTION_ATTRIBUTE, NICKNAME_ATTRIBUTE,
};
use crate::error::MigrationError;
use crate::rule::NodeRule;

pub const ARC_START_MIDDLE_END: &str = "Dynamo.Nodes.ArcStartMiddleEnd";
pub const ARC_CENTER: &str = "Dynamo.Nodes.ArcCenter";

const GEOMETRY_LIBRARY: &str = "ProtoGeometry.dll";

pub fn arc_start_middle_end_rules() -> Result<Vec<NodeRule>, MigrationError> {
    Ok(vec![NodeRule::new(
        "ArcStartMiddleEnd 0.6.3",
        "0.6.3",
        "0.7.0.0",
        migrate_arc_start_middle_end,
    )?])
}

pub fn arc_center_rules() -> Result<Vec<NodeRule>, MigrationError> {
    Ok(vec![NodeRule::new(
        "ArcCenter 0.6.3",
        "0.6.3",
        "0.7.0.0",
        migrate_arc_center,
    )?])
}

pub fn migrate_arc_start_middle_end(
    data: NodeMigrationData<'_>,
) -> Result<NodeMigrationData<'_>, MigrationError> {
    migrate_to_canonical(
        data,
        GEOMETRY_LIBRARY,
        "Arc.ByPointsOnCurve",
        "Arc.ByPointsOnCurve@Point,Point,Point",
    )
}

/// Legacy inputs: `center, radius, start, end`. New inputs:
/// `center, radius, startAngle, sweepAngle, normal`, with
/// `sweep = end - start` and `normal = CoordinateSystem.Identity.ZAxis`.
///
/// Assumes the center input is a point, never a transform.
pub fn migrate_arc_center(
    mut data: NodeMigrationData<'_>,
) -> Result<NodeMigrationData<'_>, MigrationError> {
    let legacy = data.take_nodes();
    let this_node = legacy
        .first()
        .ok_or_else(|| MigrationError::InvalidArgument {
            argument: "data",
            reason: "no node to migrate".to_string(),
        })?;
    let this_id = guid_of(this_node)?;

    let mut arc = duplicate_with_all_attributes(this_node);
    arc.set_attribute(ASSEMBLY_ATTRIBUTE, GEOMETRY_LIBRARY);
    arc.set_attribute(NICKNAME_ATTRIBUTE, "Arc.ByCenterPointRadiusAngle");
    arc.set_attribute(
        FUNCTION_ATTRIBUTE,
        "Arc.ByCenterPointRadiusAngle@Point,double,double,double,Vector",
    );

    let identity = create_canonical_element(
        GEOMETRY_LIBRARY,
        "CoordinateSystem.Identity",
        "CoordinateSystem.Identity",
    );
    let z_axis = create_canonical_element(
        GEOMETRY_LIBRARY,
        "CoordinateSystem.ZAxis",
        "CoordinateSystem.ZAxis",
    );
    let subtraction = create_canonical_element("", "-", "-@,");
    let subtraction_id = guid_of(&subtraction)?;

    // Whatever fed the old "end" input now feeds the subtraction.
    if let Some(end_wire) = data.find_first_connector(&PortId::input(this_id.clone(), 3)) {
        data.reconnect_to_port(end_wire, &PortId::input(subtraction_id.clone(), 0))?;
    }

    // The old "start" source, from the same output port, also feeds the
    // subtraction's second operand.
    if let Some(start_wire) = data.find_first_connector(&PortId::input(this_id.clone(), 2)) {
        let source = data.connector_view(start_wire)?.start_port();
        data.create_connector_from_id(
            source.owning_node,
            source.port_index,
            subtraction_id.clone(),
            1,
        );
    }

    data.create_connector(&subtraction, 0, &arc, 3)?;
    data.create_connector(&z_axis, 0, &arc, 4)?;
    data.create_connector(&identity, 0, &z_axis, 0)?;

    data.append_node(arc);
    data.append_node(identity);
    data.append_node(z_axis);
    data.append_node(subtraction);
    Ok(data)
}
