// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Static remediation advice keyed by detected defect label.

use super::bounding_box::BoundingBox;

/// Cause, fix and step-by-step instructions for one defect label.
#[derive(Debug, PartialEq, Eq)]
pub struct Remedy {
    pub cause: &'static str,
    pub remedy: &'static str,
    pub steps: &'static [&'static str],
}

const REMEDIES: &[(&str, Remedy)] = &[
    (
        "yellowing leaves",
        Remedy {
            cause: "Usually indicates nitrogen deficiency or improper pH levels in the nutrient solution.",
            remedy: "Adjust nutrient solution and pH levels",
            steps: &[
                "Test the pH level of your nutrient solution (ideal range: 5.5-6.5)",
                "Check nitrogen levels in your nutrient solution",
                "If needed, add nitrogen-rich nutrients according to manufacturer's instructions",
                "Monitor plant for 3-5 days for improvement",
                "If no improvement, consider testing for other nutrient deficiencies",
            ],
        },
    ),
    (
        "wilting",
        Remedy {
            cause: "Often caused by improper water levels, root problems, or high temperatures.",
            remedy: "Optimize water delivery and environmental conditions",
            steps: &[
                "Check water pump functionality and flow rate",
                "Inspect roots for signs of rot or disease",
                "Verify water temperature (ideal: 65-75°F / 18-24°C)",
                "Ensure proper air circulation around plants",
                "Adjust ambient temperature if needed",
            ],
        },
    ),
    (
        "curling edges",
        Remedy {
            cause: "Usually indicates heat stress, light burn, or nutrient imbalance.",
            remedy: "Adjust environmental conditions and nutrient balance",
            steps: &[
                "Check distance between plants and grow lights",
                "Monitor temperature around plant canopy",
                "Verify humidity levels (ideal: 50-70%)",
                "Test calcium and magnesium levels",
                "Adjust nutrient solution if necessary",
            ],
        },
    ),
    (
        "brown spots",
        Remedy {
            cause: "Could indicate fungal infection, nutrient burn, or light burn.",
            remedy: "Identify the specific cause and adjust environmental conditions",
            steps: &[
                "Check for signs of fungal growth or disease",
                "Review recent changes in nutrient concentration",
                "Verify light intensity and distance from plants",
                "Improve air circulation if needed",
                "Consider applying organic fungicide if disease is confirmed",
            ],
        },
    ),
    (
        "purple veins",
        Remedy {
            cause: "Often indicates phosphorus deficiency or cold stress.",
            remedy: "Adjust nutrient levels and temperature",
            steps: &[
                "Check water temperature (should be above 65°F/18°C)",
                "Test phosphorus levels in nutrient solution",
                "Adjust pH to improve phosphorus uptake (ideal: 5.5-6.5)",
                "Add phosphorus supplement if needed",
                "Monitor ambient temperature and adjust if too cold",
            ],
        },
    ),
    (
        "stunted growth",
        Remedy {
            cause: "Multiple possible causes: nutrient deficiency, root problems, or environmental stress.",
            remedy: "Systematic check of growing conditions",
            steps: &[
                "Inspect root system for health and growth",
                "Check overall nutrient solution concentration (EC/PPM)",
                "Verify all essential nutrients are present",
                "Ensure proper light intensity and duration",
                "Monitor temperature and humidity levels",
            ],
        },
    ),
];

/// Look up advice for an exact label.
pub fn lookup(label: &str) -> Option<&'static Remedy> {
    REMEDIES
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, remedy)| remedy)
}

/// Advice panels for the current detections.
///
/// Each distinct label appears once, in first-seen order. Labels without an
/// entry are skipped.
pub fn remediation_panels(boxes: &[BoundingBox]) -> Vec<(&str, &'static Remedy)> {
    let mut seen: Vec<&str> = Vec::new();
    for bbox in boxes {
        if !seen.contains(&bbox.label.as_str()) {
            seen.push(&bbox.label);
        }
    }

    seen.into_iter()
        .filter_map(|label| match lookup(label) {
            Some(remedy) => Some((label, remedy)),
            None => {
                log::warn!("No feedback found for issue: {}", label);
                None
            }
        })
        .collect()
}
