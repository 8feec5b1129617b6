//! Whole-scene tests: traversal properties and the robot army layout

mod probes;
