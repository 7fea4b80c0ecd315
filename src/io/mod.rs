// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, camera and report files.

#[cfg(feature = "video-opencv")]
pub mod camera;
pub mod media;
pub mod serialization;
