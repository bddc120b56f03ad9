//! Layouts shared by the 2022 and 2024 generations.
//!
//! Packet schemas here name their nested records (`PacketHeader`, `LapData`,
//! ...) rather than embedding them, so the same packet layout picks up each
//! generation's own header and per-car records.

use crate::header::MAX_CARS;
use crate::schema::{EventCode, F32, F64, FieldType, I8, I16, Schema, U8, U16, U32};
use crate::{array_of, schema};

const HEADER: FieldType = FieldType::Record("PacketHeader");

pub static CAR_MOTION_DATA: Schema = schema!("CarMotionData" {
    world_position_x: F32,
    world_position_y: F32,
    world_position_z: F32,
    world_velocity_x: F32,
    world_velocity_y: F32,
    world_velocity_z: F32,
    world_forward_dir_x: I16,
    world_forward_dir_y: I16,
    world_forward_dir_z: I16,
    world_right_dir_x: I16,
    world_right_dir_y: I16,
    world_right_dir_z: I16,
    g_force_lateral: F32,
    g_force_longitudinal: F32,
    g_force_vertical: F32,
    yaw: F32,
    pitch: F32,
    roll: F32,
});

pub static MARSHAL_ZONE: Schema = schema!("MarshalZone" {
    zone_start: F32,
    zone_flag: I8,
});

pub static WEATHER_FORECAST_SAMPLE: Schema = schema!("WeatherForecastSample" {
    session_type: U8,
    time_offset: U8,
    weather: U8,
    track_temperature: I8,
    track_temperature_change: I8,
    air_temperature: I8,
    air_temperature_change: I8,
    rain_percentage: U8,
});

pub static CAR_TELEMETRY_DATA: Schema = schema!("CarTelemetryData" {
    speed: U16,
    throttle: F32,
    steer: F32,
    brake: F32,
    clutch: U8,
    gear: I8,
    engine_rpm: U16,
    drs: U8,
    rev_lights_percent: U8,
    rev_lights_bit_value: U16,
    brakes_temperature: array_of![U16; 4],
    tyres_surface_temperature: array_of![U8; 4],
    tyres_inner_temperature: array_of![U8; 4],
    engine_temperature: U16,
    tyres_pressure: array_of![F32; 4],
    surface_type: array_of![U8; 4],
});

pub static FINAL_CLASSIFICATION_DATA: Schema = schema!("FinalClassificationData" {
    position: U8,
    num_laps: U8,
    grid_position: U8,
    points: U8,
    num_pit_stops: U8,
    result_status: U8,
    best_lap_time_in_ms: U32,
    total_race_time: F64,
    penalties_time: U8,
    num_penalties: U8,
    num_tyre_stints: U8,
    tyre_stints_actual: array_of![U8; 8],
    tyre_stints_visual: array_of![U8; 8],
    tyre_stints_end_laps: array_of![U8; 8],
});

pub static CAR_DAMAGE_DATA: Schema = schema!("CarDamageData" {
    tyres_wear: array_of![F32; 4],
    tyres_damage: array_of![U8; 4],
    brakes_damage: array_of![U8; 4],
    front_left_wing_damage: U8,
    front_right_wing_damage: U8,
    rear_wing_damage: U8,
    floor_damage: U8,
    diffuser_damage: U8,
    sidepod_damage: U8,
    drs_fault: U8,
    ers_fault: U8,
    gear_box_damage: U8,
    engine_damage: U8,
    engine_mguh_wear: U8,
    engine_es_wear: U8,
    engine_ce_wear: U8,
    engine_ice_wear: U8,
    engine_mguk_wear: U8,
    engine_tc_wear: U8,
    engine_blown: U8,
    engine_seized: U8,
});

pub static TYRE_STINT_HISTORY_DATA: Schema = schema!("TyreStintHistoryData" {
    end_lap: U8,
    tyre_actual_compound: U8,
    tyre_visual_compound: U8,
});

// Event payloads.

pub static FASTEST_LAP: Schema = schema!("FastestLap" {
    vehicle_idx: U8,
    lap_time: F32,
});

pub static RETIREMENT: Schema = schema!("Retirement" { vehicle_idx: U8 });

pub static TEAM_MATE_IN_PITS: Schema = schema!("TeamMateInPits" { vehicle_idx: U8 });

pub static RACE_WINNER: Schema = schema!("RaceWinner" { vehicle_idx: U8 });

pub static PENALTY: Schema = schema!("Penalty" {
    penalty_type: U8,
    infringement_type: U8,
    vehicle_idx: U8,
    other_vehicle_idx: U8,
    time: U8,
    lap_num: U8,
    places_gained: U8,
});

pub static SPEED_TRAP: Schema = schema!("SpeedTrap" {
    vehicle_idx: U8,
    speed: F32,
    is_overall_fastest_in_session: U8,
    is_driver_fastest_in_session: U8,
    fastest_vehicle_idx_in_session: U8,
    fastest_speed_in_session: F32,
});

pub static START_LIGHTS: Schema = schema!("StartLights" { num_lights: U8 });

pub static DRIVE_THROUGH_PENALTY_SERVED: Schema =
    schema!("DriveThroughPenaltyServed" { vehicle_idx: U8 });

pub static FLASHBACK: Schema = schema!("Flashback" {
    flashback_frame_identifier: U32,
    flashback_session_time: F32,
});

pub static BUTTONS: Schema = schema!("Buttons" { button_status: U32 });

/// Shorthand for an [`EventCode`] table entry.
pub const fn code(
    code: &[u8; 4],
    variant: Option<&'static str>,
    description: &'static str,
) -> EventCode {
    EventCode {
        code: *code,
        variant,
        description,
    }
}

// Packets whose layout only differs through their nested records.

pub static PACKET_LAP_DATA: Schema = schema!("PacketLapData" {
    header: HEADER,
    lap_data: array_of![FieldType::Record("LapData"); MAX_CARS],
    time_trial_pb_car_idx: U8,
    time_trial_rival_car_idx: U8,
});

pub static PACKET_PARTICIPANTS_DATA: Schema = schema!("PacketParticipantsData" {
    header: HEADER,
    num_active_cars: U8,
    participants: array_of![FieldType::Record("ParticipantData"); MAX_CARS],
});

pub static PACKET_CAR_TELEMETRY_DATA: Schema = schema!("PacketCarTelemetryData" {
    header: HEADER,
    car_telemetry_data: array_of![FieldType::Record("CarTelemetryData"); MAX_CARS],
    mfd_panel_index: U8,
    mfd_panel_index_secondary_player: U8,
    suggested_gear: I8,
});

pub static PACKET_CAR_STATUS_DATA: Schema = schema!("PacketCarStatusData" {
    header: HEADER,
    car_status_data: array_of![FieldType::Record("CarStatusData"); MAX_CARS],
});

pub static PACKET_FINAL_CLASSIFICATION_DATA: Schema = schema!("PacketFinalClassificationData" {
    header: HEADER,
    num_cars: U8,
    classification_data: array_of![FieldType::Record("FinalClassificationData"); MAX_CARS],
});

pub static PACKET_LOBBY_INFO_DATA: Schema = schema!("PacketLobbyInfoData" {
    header: HEADER,
    num_players: U8,
    lobby_players: array_of![FieldType::Record("LobbyInfoData"); MAX_CARS],
});

pub static PACKET_CAR_DAMAGE_DATA: Schema = schema!("PacketCarDamageData" {
    header: HEADER,
    car_damage_data: array_of![FieldType::Record("CarDamageData"); MAX_CARS],
});

pub static PACKET_SESSION_HISTORY_DATA: Schema = schema!("PacketSessionHistoryData" {
    header: HEADER,
    car_idx: U8,
    num_laps: U8,
    num_tyre_stints: U8,
    best_lap_time_lap_num: U8,
    best_sector1_lap_num: U8,
    best_sector2_lap_num: U8,
    best_sector3_lap_num: U8,
    lap_history_data: array_of![FieldType::Record("LapHistoryData"); 100],
    tyre_stints_history_data: array_of![FieldType::Record("TyreStintHistoryData"); 8],
});
