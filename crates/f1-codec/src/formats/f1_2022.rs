//! F1 22 (`packet_format` 2022). Header is 24 bytes; packet ids 0..=11.

use super::FormatDefinition;
use super::common::{self, code};
use crate::dispatch::PacketKind;
use crate::generation::Generation;
use crate::header::MAX_CARS;
use crate::schema::{
    F32, FieldType, I8, Schema, U8, U16, U32, U64, UnionSchema, UnionVariant,
};
use crate::{array_of, schema};

const HEADER: FieldType = FieldType::Record("PacketHeader");

pub static PACKET_HEADER: Schema = schema!("PacketHeader" {
    packet_format: U16,
    game_major_version: U8,
    game_minor_version: U8,
    packet_version: U8,
    packet_id: U8,
    session_uid: U64,
    session_time: F32,
    frame_identifier: U32,
    player_car_index: U8,
    secondary_player_car_index: U8,
});

pub static PACKET_MOTION_DATA: Schema = schema!("PacketMotionData" {
    header: HEADER,
    car_motion_data: array_of![FieldType::Record("CarMotionData"); MAX_CARS],
    suspension_position: array_of![F32; 4],
    suspension_velocity: array_of![F32; 4],
    suspension_acceleration: array_of![F32; 4],
    wheel_speed: array_of![F32; 4],
    wheel_slip: array_of![F32; 4],
    local_velocity_x: F32,
    local_velocity_y: F32,
    local_velocity_z: F32,
    angular_velocity_x: F32,
    angular_velocity_y: F32,
    angular_velocity_z: F32,
    angular_acceleration_x: F32,
    angular_acceleration_y: F32,
    angular_acceleration_z: F32,
    front_wheels_angle: F32,
});

pub static PACKET_SESSION_DATA: Schema = schema!("PacketSessionData" {
    header: HEADER,
    weather: U8,
    track_temperature: I8,
    air_temperature: I8,
    total_laps: U8,
    track_length: U16,
    session_type: U8,
    track_id: I8,
    formula: U8,
    session_time_left: U16,
    session_duration: U16,
    pit_speed_limit: U8,
    game_paused: U8,
    is_spectating: U8,
    spectator_car_index: U8,
    sli_pro_native_support: U8,
    num_marshal_zones: U8,
    marshal_zones: array_of![FieldType::Record("MarshalZone"); 21],
    safety_car_status: U8,
    network_game: U8,
    num_weather_forecast_samples: U8,
    weather_forecast_samples: array_of![FieldType::Record("WeatherForecastSample"); 56],
    forecast_accuracy: U8,
    ai_difficulty: U8,
    season_link_identifier: U32,
    weekend_link_identifier: U32,
    session_link_identifier: U32,
    pit_stop_window_ideal_lap: U8,
    pit_stop_window_latest_lap: U8,
    pit_stop_rejoin_position: U8,
    steering_assist: U8,
    braking_assist: U8,
    gearbox_assist: U8,
    pit_assist: U8,
    pit_release_assist: U8,
    ers_assist: U8,
    drs_assist: U8,
    dynamic_racing_line: U8,
    dynamic_racing_line_type: U8,
    game_mode: U8,
    rule_set: U8,
    time_of_day: U32,
    session_length: U8,
});

pub static LAP_DATA: Schema = schema!("LapData" {
    last_lap_time_in_ms: U32,
    current_lap_time_in_ms: U32,
    sector1_time_in_ms: U16,
    sector2_time_in_ms: U16,
    lap_distance: F32,
    total_distance: F32,
    safety_car_delta: F32,
    car_position: U8,
    current_lap_num: U8,
    pit_status: U8,
    num_pit_stops: U8,
    sector: U8,
    current_lap_invalid: U8,
    penalties: U8,
    warnings: U8,
    num_unserved_drive_through_pens: U8,
    num_unserved_stop_go_pens: U8,
    grid_position: U8,
    driver_status: U8,
    result_status: U8,
    pit_lane_timer_active: U8,
    pit_lane_time_in_lane_in_ms: U16,
    pit_stop_timer_in_ms: U16,
    pit_stop_should_serve_pen: U8,
});

pub static STOP_GO_PENALTY_SERVED: Schema = schema!("StopGoPenaltyServed" { vehicle_idx: U8 });

pub static EVENT_DATA_DETAILS: UnionSchema = UnionSchema {
    name: "EventDataDetails",
    selector: "event_string_code",
    variants: &[
        UnionVariant { name: "fastest_lap", schema: "FastestLap" },
        UnionVariant { name: "retirement", schema: "Retirement" },
        UnionVariant { name: "team_mate_in_pits", schema: "TeamMateInPits" },
        UnionVariant { name: "race_winner", schema: "RaceWinner" },
        UnionVariant { name: "penalty", schema: "Penalty" },
        UnionVariant { name: "speed_trap", schema: "SpeedTrap" },
        UnionVariant { name: "start_lights", schema: "StartLights" },
        UnionVariant { name: "drive_through_penalty_served", schema: "DriveThroughPenaltyServed" },
        UnionVariant { name: "stop_go_penalty_served", schema: "StopGoPenaltyServed" },
        UnionVariant { name: "flashback", schema: "Flashback" },
        UnionVariant { name: "buttons", schema: "Buttons" },
    ],
    codes: &[
        code(b"SSTA", None, "Session started"),
        code(b"SEND", None, "Session ended"),
        code(b"FTLP", Some("fastest_lap"), "Fastest lap"),
        code(b"RTMT", Some("retirement"), "Retirement"),
        code(b"DRSE", None, "DRS enabled"),
        code(b"DRSD", None, "DRS disabled"),
        code(b"TMPT", Some("team_mate_in_pits"), "Team mate in pits"),
        code(b"CHQF", None, "Chequered flag"),
        code(b"RCWN", Some("race_winner"), "Race winner"),
        code(b"PENA", Some("penalty"), "Penalty issued"),
        code(b"SPTP", Some("speed_trap"), "Speed trap triggered"),
        code(b"STLG", Some("start_lights"), "Start lights"),
        code(b"LGOT", None, "Lights out"),
        code(b"DTSV", Some("drive_through_penalty_served"), "Drive through served"),
        code(b"SGSV", Some("stop_go_penalty_served"), "Stop go served"),
        code(b"FLBK", Some("flashback"), "Flashback"),
        code(b"BUTN", Some("buttons"), "Button status"),
    ],
};

pub static PACKET_EVENT_DATA: Schema = schema!("PacketEventData" {
    header: HEADER,
    event_string_code: FieldType::Text(4),
    event_details: FieldType::EventUnion(&EVENT_DATA_DETAILS),
});

pub static PARTICIPANT_DATA: Schema = schema!("ParticipantData" {
    ai_controlled: U8,
    driver_id: U8,
    network_id: U8,
    team_id: U8,
    my_team: U8,
    race_number: U8,
    nationality: U8,
    name: FieldType::Text(48),
    your_telemetry: U8,
});

pub static CAR_SETUP_DATA: Schema = schema!("CarSetupData" {
    front_wing: U8,
    rear_wing: U8,
    on_throttle: U8,
    off_throttle: U8,
    front_camber: F32,
    rear_camber: F32,
    front_toe: F32,
    rear_toe: F32,
    front_suspension: U8,
    rear_suspension: U8,
    front_anti_roll_bar: U8,
    rear_anti_roll_bar: U8,
    front_suspension_height: U8,
    rear_suspension_height: U8,
    brake_pressure: U8,
    brake_bias: U8,
    rear_left_tyre_pressure: F32,
    rear_right_tyre_pressure: F32,
    front_left_tyre_pressure: F32,
    front_right_tyre_pressure: F32,
    ballast: U8,
    fuel_load: F32,
});

pub static PACKET_CAR_SETUP_DATA: Schema = schema!("PacketCarSetupData" {
    header: HEADER,
    car_setups: array_of![FieldType::Record("CarSetupData"); MAX_CARS],
});

pub static CAR_STATUS_DATA: Schema = schema!("CarStatusData" {
    traction_control: U8,
    anti_lock_brakes: U8,
    fuel_mix: U8,
    front_brake_bias: U8,
    pit_limiter_status: U8,
    fuel_in_tank: F32,
    fuel_capacity: F32,
    fuel_remaining_laps: F32,
    max_rpm: U16,
    idle_rpm: U16,
    max_gears: U8,
    drs_allowed: U8,
    drs_activation_distance: U16,
    actual_tyre_compound: U8,
    visual_tyre_compound: U8,
    tyres_age_laps: U8,
    vehicle_fia_flags: I8,
    ers_store_energy: F32,
    ers_deploy_mode: U8,
    ers_harvested_this_lap_mguk: F32,
    ers_harvested_this_lap_mguh: F32,
    ers_deployed_this_lap: F32,
    network_paused: U8,
});

pub static LOBBY_INFO_DATA: Schema = schema!("LobbyInfoData" {
    ai_controlled: U8,
    team_id: U8,
    nationality: U8,
    name: FieldType::Text(48),
    car_number: U8,
    ready_status: U8,
});

pub static LAP_HISTORY_DATA: Schema = schema!("LapHistoryData" {
    lap_time_in_ms: U32,
    sector1_time_in_ms: U16,
    sector2_time_in_ms: U16,
    sector3_time_in_ms: U16,
    lap_valid_bit_flags: U8,
});

pub static FORMAT: FormatDefinition = FormatDefinition {
    generation: Generation::F2022,
    packet_version: 1,
    schemas: &[
        &PACKET_HEADER,
        &common::CAR_MOTION_DATA,
        &common::MARSHAL_ZONE,
        &common::WEATHER_FORECAST_SAMPLE,
        &common::CAR_TELEMETRY_DATA,
        &common::FINAL_CLASSIFICATION_DATA,
        &common::CAR_DAMAGE_DATA,
        &common::TYRE_STINT_HISTORY_DATA,
        &common::FASTEST_LAP,
        &common::RETIREMENT,
        &common::TEAM_MATE_IN_PITS,
        &common::RACE_WINNER,
        &common::PENALTY,
        &common::SPEED_TRAP,
        &common::START_LIGHTS,
        &common::DRIVE_THROUGH_PENALTY_SERVED,
        &STOP_GO_PENALTY_SERVED,
        &common::FLASHBACK,
        &common::BUTTONS,
        &LAP_DATA,
        &PARTICIPANT_DATA,
        &CAR_SETUP_DATA,
        &CAR_STATUS_DATA,
        &LOBBY_INFO_DATA,
        &LAP_HISTORY_DATA,
        &PACKET_MOTION_DATA,
        &PACKET_SESSION_DATA,
        &common::PACKET_LAP_DATA,
        &PACKET_EVENT_DATA,
        &common::PACKET_PARTICIPANTS_DATA,
        &PACKET_CAR_SETUP_DATA,
        &common::PACKET_CAR_TELEMETRY_DATA,
        &common::PACKET_CAR_STATUS_DATA,
        &common::PACKET_FINAL_CLASSIFICATION_DATA,
        &common::PACKET_LOBBY_INFO_DATA,
        &common::PACKET_CAR_DAMAGE_DATA,
        &common::PACKET_SESSION_HISTORY_DATA,
    ],
    packets: &[
        (PacketKind::Motion, "PacketMotionData"),
        (PacketKind::Session, "PacketSessionData"),
        (PacketKind::LapData, "PacketLapData"),
        (PacketKind::Event, "PacketEventData"),
        (PacketKind::Participants, "PacketParticipantsData"),
        (PacketKind::CarSetups, "PacketCarSetupData"),
        (PacketKind::CarTelemetry, "PacketCarTelemetryData"),
        (PacketKind::CarStatus, "PacketCarStatusData"),
        (PacketKind::FinalClassification, "PacketFinalClassificationData"),
        (PacketKind::LobbyInfo, "PacketLobbyInfoData"),
        (PacketKind::CarDamage, "PacketCarDamageData"),
        (PacketKind::SessionHistory, "PacketSessionHistoryData"),
    ],
};
